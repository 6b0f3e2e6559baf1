use chrono::{Duration, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use server::entity::{event, project, project_contributor, task, user};
use server::seed;

use crate::common::TestApp;

mod admin_bootstrap {
    use super::*;

    #[tokio::test]
    async fn empty_store_gets_one_admin_and_one_flagship_project() {
        let app = TestApp::spawn().await;
        let now = Utc::now();

        let seeded = seed::seed_admin_and_flagship(&app.db, now).await.unwrap();
        assert!(seeded);

        let admins = user::Entity::find()
            .filter(user::Column::Username.eq(seed::ADMIN_USERNAME))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert!(admins[0].is_admin);
        assert_eq!(admins[0].email, "admin@example.com");

        let projects = project::Entity::find()
            .filter(project::Column::Name.eq(seed::FLAGSHIP_PROJECT))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].status, "in_progress");
        assert_eq!(projects[0].lead_id, Some(admins[0].id));

        // The admin is the sole contributor, listed explicitly.
        let contributors = project_contributor::Entity::find()
            .filter(project_contributor::Column::ProjectId.eq(projects[0].id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(contributors.len(), 1);
        assert_eq!(contributors[0].user_id, admins[0].id);
    }

    #[tokio::test]
    async fn second_run_is_a_pure_noop() {
        let app = TestApp::spawn().await;
        let now = Utc::now();

        assert!(seed::seed_admin_and_flagship(&app.db, now).await.unwrap());
        assert!(!seed::seed_admin_and_flagship(&app.db, now).await.unwrap());

        let admin_count = user::Entity::find()
            .filter(user::Column::Username.eq(seed::ADMIN_USERNAME))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(admin_count, 1);

        let project_count = project::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(project_count, 1);
    }

    #[tokio::test]
    async fn admin_can_log_in_with_the_seeded_password() {
        let app = TestApp::spawn().await;

        seed::seed_admin_and_flagship(&app.db, Utc::now())
            .await
            .unwrap();

        let res = app
            .post_without_token(
                crate::common::routes::LOGIN,
                &serde_json::json!({
                    "username": seed::ADMIN_USERNAME,
                    "password": seed::DEMO_PASSWORD,
                }),
            )
            .await;

        assert_eq!(res.status, 200, "Seeded admin login failed: {}", res.text);
        assert_eq!(res.body["is_admin"], true);
    }
}

mod events_seed {
    use super::*;

    #[tokio::test]
    async fn one_run_creates_the_fixed_event_list() {
        let app = TestApp::spawn().await;
        let now = Utc::now();

        let created = seed::seed_events(&app.db, now).await.unwrap();
        assert_eq!(created, 3);

        let events = event::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(events.len(), 3);
        for e in &events {
            assert!(e.event_date > now);
        }
    }

    #[tokio::test]
    async fn rerun_duplicates_events() {
        let app = TestApp::spawn().await;
        let now = Utc::now();

        seed::seed_events(&app.db, now).await.unwrap();
        seed::seed_events(&app.db, now).await.unwrap();

        // The routine carries no existence guard, so two runs mean two copies.
        let count = event::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 6);
    }
}

mod member_seed {
    use super::*;

    #[tokio::test]
    async fn creates_ten_members_with_demo_attributes() {
        let app = TestApp::spawn().await;
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(42);

        seed::seed_admin_and_flagship(&app.db, now).await.unwrap();
        let report = seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();
        assert_eq!(report.users_created, 10);
        assert_eq!(report.tasks_created, 10);

        for i in 1..=10 {
            let member = user::Entity::find()
                .filter(user::Column::Username.eq(format!("user{i}")))
                .one(&app.db)
                .await
                .unwrap()
                .expect("demo member should exist");

            assert!(member.is_member);
            assert!(!member.is_admin);
            assert_eq!(member.email, format!("user{i}@example.com"));
            assert_eq!(member.student_id, Some(format!("NST{}", 2023000 + i)));
            assert_eq!(member.batch_year, Some(2025));
            assert!((10..=500).contains(&member.points));
            assert!(user::SKILL_LEVELS.contains(&member.skill_level.as_str()));
        }
    }

    #[tokio::test]
    async fn rerun_keeps_users_but_doubles_tasks() {
        let app = TestApp::spawn().await;
        let now = Utc::now();

        seed::seed_admin_and_flagship(&app.db, now).await.unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        let second = seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();
        assert_eq!(second.users_created, 0);
        assert_eq!(second.tasks_created, 10);

        let member_count = user::Entity::find()
            .filter(user::Column::IsAdmin.eq(false))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(member_count, 10);

        let task_count = task::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(task_count, 20);
    }

    #[tokio::test]
    async fn rerun_leaves_existing_accounts_untouched() {
        let app = TestApp::spawn().await;
        let now = Utc::now();

        seed::seed_admin_and_flagship(&app.db, now).await.unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();

        let before = user::Entity::find()
            .filter(user::Column::Username.eq("user1"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();

        let mut rng = StdRng::seed_from_u64(99);
        seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();

        let after = user::Entity::find()
            .filter(user::Column::Username.eq("user1"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn task_due_dates_fall_within_a_week_of_now() {
        let app = TestApp::spawn().await;
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(7);

        seed::seed_admin_and_flagship(&app.db, now).await.unwrap();
        seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();

        let tasks = task::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(tasks.len(), 10);
        for t in &tasks {
            assert!(t.due_date > now, "due date must be in the future");
            assert!(t.due_date <= now + Duration::days(7));
            assert_eq!(t.points, 20);
            assert!(!t.verified);
            assert!(task::STATUSES.contains(&t.status.as_str()));
        }
    }

    #[tokio::test]
    async fn contributor_set_contains_the_lead_and_never_shrinks() {
        let app = TestApp::spawn().await;
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(3);

        seed::seed_admin_and_flagship(&app.db, now).await.unwrap();

        let admin = user::Entity::find()
            .filter(user::Column::Username.eq(seed::ADMIN_USERNAME))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let flagship = project::Entity::find()
            .filter(project::Column::Name.eq(seed::FLAGSHIP_PROJECT))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();

        seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();

        let contributors: Vec<i32> = project_contributor::Entity::find()
            .filter(project_contributor::Column::ProjectId.eq(flagship.id))
            .all(&app.db)
            .await
            .unwrap()
            .into_iter()
            .map(|pc| pc.user_id)
            .collect();

        // admin + 10 demo members, lead still present
        assert_eq!(contributors.len(), 11);
        assert!(contributors.contains(&admin.id));
    }

    #[tokio::test]
    async fn runs_without_an_admin_and_creates_a_leadless_project() {
        let app = TestApp::spawn().await;
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(5);

        // No admin bootstrap: the routine reports the problem but continues.
        let report = seed::seed_demo_members(&app.db, &mut rng, now)
            .await
            .unwrap();
        assert_eq!(report.users_created, 10);

        let flagship = project::Entity::find()
            .filter(project::Column::Name.eq(seed::FLAGSHIP_PROJECT))
            .one(&app.db)
            .await
            .unwrap()
            .expect("flagship project should be created on demand");
        assert_eq!(flagship.lead_id, None);

        let contributor_count = project_contributor::Entity::find()
            .filter(project_contributor::Column::ProjectId.eq(flagship.id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(contributor_count, 10);
    }

    #[tokio::test]
    async fn identical_rng_seeds_produce_identical_demo_data() {
        let app_a = TestApp::spawn().await;
        let app_b = TestApp::spawn().await;
        let now = Utc::now();

        let mut rng = StdRng::seed_from_u64(11);
        seed::seed_demo_members(&app_a.db, &mut rng, now)
            .await
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        seed::seed_demo_members(&app_b.db, &mut rng, now)
            .await
            .unwrap();

        for i in 1..=10 {
            let a = user::Entity::find()
                .filter(user::Column::Username.eq(format!("user{i}")))
                .one(&app_a.db)
                .await
                .unwrap()
                .unwrap();
            let b = user::Entity::find()
                .filter(user::Column::Username.eq(format!("user{i}")))
                .one(&app_b.db)
                .await
                .unwrap()
                .unwrap();

            assert_eq!(a.points, b.points);
            assert_eq!(a.skill_level, b.skill_level);
        }
    }
}
