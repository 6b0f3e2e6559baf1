use serde_json::json;

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn admin_can_assign_a_task_with_defaults() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 0).await;

        let res = app
            .post_with_token(
                routes::TASKS,
                &json!({
                    "title": "Write docs",
                    "description": "Document the API.",
                    "assigned_to": member_id,
                    "due_date": "2099-01-01T00:00:00Z",
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["status"], "pending");
        assert_eq!(res.body["points"], 20);
        assert_eq!(res.body["verified"], false);
    }

    #[tokio::test]
    async fn the_assignee_must_exist() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;

        let res = app
            .post_with_token(
                routes::TASKS,
                &json!({
                    "title": "Ghost task",
                    "description": "Nobody to do it.",
                    "assigned_to": 424242,
                    "due_date": "2099-01-01T00:00:00Z",
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_admin_cannot_create_tasks() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 0).await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::TASKS,
                &json!({
                    "title": "Rogue task",
                    "description": "Should not exist.",
                    "assigned_to": member_id,
                    "due_date": "2099-01-01T00:00:00Z",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod visibility {
    use super::*;

    #[tokio::test]
    async fn members_only_see_their_own_tasks() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let other_id = app.create_member(&admin, "other", 0).await;
        app.create_task(&admin, other_id, 20).await;

        let alice = app.create_authenticated_user("alice", "securepass").await;
        let profile = app.get_with_token(routes::PROFILE, &alice).await;
        let alice_id = profile.id();
        let own_task = app.create_task(&admin, alice_id, 20).await;

        let res = app.get_with_token(routes::TASKS, &alice).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], own_task);
    }

    #[tokio::test]
    async fn admins_see_all_tasks() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let a = app.create_member(&admin, "aaa", 0).await;
        let b = app.create_member(&admin, "bbb", 0).await;
        app.create_task(&admin, a, 20).await;
        app.create_task(&admin, b, 20).await;

        let res = app.get_with_token(routes::TASKS, &admin).await;

        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn members_cannot_fetch_someone_elses_task() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let other_id = app.create_member(&admin, "other", 0).await;
        let task_id = app.create_task(&admin, other_id, 20).await;
        let alice = app.create_authenticated_user("alice", "securepass").await;

        let res = app.get_with_token(&routes::task(task_id), &alice).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod verification {
    use super::*;

    #[tokio::test]
    async fn verifying_a_task_awards_its_points_to_the_assignee() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 100).await;
        let task_id = app.create_task(&admin, member_id, 30).await;

        let res = app
            .post_with_token(&routes::task_verify(task_id), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 200, "Verify failed: {}", res.text);
        assert_eq!(res.body["verified"], true);

        let member = app.get_with_token(&routes::user(member_id), &admin).await;
        assert_eq!(member.body["points"], 130);
    }

    #[tokio::test]
    async fn a_task_can_only_be_verified_once() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 0).await;
        let task_id = app.create_task(&admin, member_id, 30).await;

        let first = app
            .post_with_token(&routes::task_verify(task_id), &json!({}), &admin)
            .await;
        assert_eq!(first.status, 200);

        let second = app
            .post_with_token(&routes::task_verify(task_id), &json!({}), &admin)
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");

        // Points are awarded exactly once.
        let member = app.get_with_token(&routes::user(member_id), &admin).await;
        assert_eq!(member.body["points"], 30);
    }

    #[tokio::test]
    async fn non_admin_cannot_verify_tasks() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 0).await;
        let task_id = app.create_task(&admin, member_id, 30).await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(&routes::task_verify(task_id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn admin_can_move_a_task_through_statuses() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 0).await;
        let task_id = app.create_task(&admin, member_id, 20).await;

        let res = app
            .patch_with_token(&routes::task(task_id), &json!({"status": "submitted"}), &admin)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "submitted");

        let bad = app
            .patch_with_token(&routes::task(task_id), &json!({"status": "archived"}), &admin)
            .await;
        assert_eq!(bad.status, 400);
        assert_eq!(bad.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn admin_can_delete_a_task() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin_user("boss", "securepass").await;
        let member_id = app.create_member(&admin, "member", 0).await;
        let task_id = app.create_task(&admin, member_id, 20).await;

        let res = app.delete_with_token(&routes::task(task_id), &admin).await;
        assert_eq!(res.status, 204);

        let gone = app.get_with_token(&routes::task(task_id), &admin).await;
        assert_eq!(gone.status, 404);
    }
}
