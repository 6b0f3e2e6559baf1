//! Demo-data bootstrap routines, run by an operator through the `seed` binary.
//!
//! Each routine is an independent unit of work: persistence failures abort the
//! routine that hit them and nothing is rolled back across routines. The
//! routines take `now` (and, where randomness is involved, an `Rng`) as
//! parameters so tests can pin time and seed the generator.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use sea_orm::*;
use tracing::{error, info};

use crate::entity::{event, project, project_contributor, task, user};
use crate::utils::hash;

/// Username of the bootstrap administrator.
pub const ADMIN_USERNAME: &str = "admin";

/// Password assigned to every seeded account.
pub const DEMO_PASSWORD: &str = "password123";

/// Name of the flagship demo project.
pub const FLAGSHIP_PROJECT: &str = "NST SDC Portal";

/// Number of `user{i}` accounts created by [`seed_demo_members`].
pub const DEMO_MEMBER_COUNT: u32 = 10;

const DEMO_BATCH_YEAR: i32 = 2025;

/// Demo events: title, description, kind, days from now, location.
const DEMO_EVENTS: &[(&str, &str, &str, i64, &str)] = &[
    (
        "Weekly Sync",
        "Weekly developers sync meeting.",
        "meeting",
        2,
        "Room 303",
    ),
    (
        "Intro to Web Dev",
        "Workshop on web development basics.",
        "workshop",
        5,
        "Auditorium",
    ),
    (
        "Hackathon 2026",
        "Annual college hackathon.",
        "competition",
        20,
        "Main Hall",
    ),
];

/// Counts reported by [`seed_demo_members`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MemberSeedReport {
    pub users_created: u32,
    pub tasks_created: u32,
}

/// Create the administrator account and the flagship project.
///
/// The existence of the `admin` account is the single idempotence guard for
/// the whole routine: when it is present, project creation is skipped too,
/// even if the project itself is missing. Returns `Ok(false)` in that case.
pub async fn seed_admin_and_flagship(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(ADMIN_USERNAME))
        .one(db)
        .await?;

    if existing.is_some() {
        info!("Data already seeded.");
        return Ok(false);
    }

    let password = hash::hash_password(DEMO_PASSWORD)
        .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;

    let admin = user::ActiveModel {
        username: Set(ADMIN_USERNAME.to_string()),
        email: Set("admin@example.com".to_string()),
        password: Set(password),
        first_name: Set("Admin".to_string()),
        last_name: Set("User".to_string()),
        is_admin: Set(true),
        is_member: Set(true),
        points: Set(0),
        student_id: Set(None),
        batch_year: Set(None),
        skill_level: Set("advanced".to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Created admin user.");

    let flagship = project::ActiveModel {
        name: Set(FLAGSHIP_PROJECT.to_string()),
        description: Set("The official portal for the NST Student Developer Club.".to_string()),
        status: Set("in_progress".to_string()),
        tech_stack: Set(serde_json::json!(["React", "Axum", "TailwindCSS"])),
        github_repo: Set(Some("https://github.com/nst-sdc/NST-SDC-Portal".to_string())),
        lead_id: Set(Some(admin.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    // The lead must be listed in the contributor set, not just referenced
    // through lead_id.
    add_contributor(db, flagship.id, admin.id, now).await?;
    info!("Created project: {}", flagship.name);

    Ok(true)
}

/// Insert the fixed list of demo calendar events.
///
/// Not idempotent: every run inserts a fresh copy of each demo event.
pub async fn seed_events(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u32, DbErr> {
    info!("Seeding events...");

    let mut created = 0u32;
    for &(title, description, event_type, days_out, location) in DEMO_EVENTS {
        event::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            event_type: Set(event_type.to_string()),
            event_date: Set(now + Duration::days(days_out)),
            location: Set(location.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("Created event: {title}");
        created += 1;
    }

    Ok(created)
}

/// Create `user1`..`user10` demo members, attach them to the flagship project,
/// and assign each a fresh task.
///
/// User creation is idempotent (existing accounts are left untouched) and the
/// contributor attach is a set-union, but one new task is created per member
/// on every run.
pub async fn seed_demo_members<R: Rng + ?Sized>(
    db: &DatabaseConnection,
    rng: &mut R,
    now: DateTime<Utc>,
) -> anyhow::Result<MemberSeedReport> {
    info!("Seeding demo users...");

    let admin = user::Entity::find()
        .filter(user::Column::IsAdmin.eq(true))
        .one(db)
        .await?;
    if admin.is_none() {
        error!("No admin user found. Run the admin bootstrap first or create one manually.");
    }

    let flagship = match project::Entity::find()
        .filter(project::Column::Name.eq(FLAGSHIP_PROJECT))
        .one(db)
        .await?
    {
        Some(p) => p,
        None => {
            project::ActiveModel {
                name: Set(FLAGSHIP_PROJECT.to_string()),
                description: Set("The official portal.".to_string()),
                status: Set("in_progress".to_string()),
                tech_stack: Set(serde_json::json!([])),
                github_repo: Set(None),
                lead_id: Set(admin.as_ref().map(|a| a.id)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    let mut report = MemberSeedReport::default();

    for i in 1..=DEMO_MEMBER_COUNT {
        let username = format!("user{i}");

        let member = match user::Entity::find()
            .filter(user::Column::Username.eq(&username))
            .one(db)
            .await?
        {
            Some(existing) => {
                info!("User {username} already exists");
                existing
            }
            None => {
                let password = hash::hash_password(DEMO_PASSWORD)
                    .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;

                let skill_level = user::SKILL_LEVELS
                    .choose(rng)
                    .copied()
                    .unwrap_or(user::DEFAULT_SKILL_LEVEL);

                let created = user::ActiveModel {
                    username: Set(username.clone()),
                    email: Set(format!("user{i}@example.com")),
                    password: Set(password),
                    first_name: Set("Demo".to_string()),
                    last_name: Set(format!("User {i}")),
                    is_admin: Set(false),
                    is_member: Set(true),
                    points: Set(rng.random_range(10..=500)),
                    student_id: Set(Some(format!("NST{}", 2023000 + i))),
                    batch_year: Set(Some(DEMO_BATCH_YEAR)),
                    skill_level: Set(skill_level.to_string()),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?;

                info!("Created {username} (pass: {DEMO_PASSWORD})");
                report.users_created += 1;
                created
            }
        };

        add_contributor(db, flagship.id, member.id, now).await?;

        let status = task::STATUSES
            .choose(rng)
            .copied()
            .unwrap_or("pending");

        task::ActiveModel {
            title: Set(format!("Fix issue #{}", rng.random_range(100..=999))),
            description: Set("Fix the reported bug in the system.".to_string()),
            points: Set(20),
            status: Set(status.to_string()),
            verified: Set(false),
            assigned_to: Set(member.id),
            due_date: Set(now + Duration::days(rng.random_range(1..=7))),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        report.tasks_created += 1;
    }

    info!(
        "Done! {} users created, {} tasks assigned.",
        report.users_created, report.tasks_created
    );

    Ok(report)
}

/// Union a user into a project's contributor set; adding an existing
/// contributor is a no-op.
async fn add_contributor(
    db: &DatabaseConnection,
    project_id: i32,
    user_id: i32,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    let model = project_contributor::ActiveModel {
        project_id: Set(project_id),
        user_id: Set(user_id),
        added_at: Set(now),
    };

    let result = project_contributor::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::columns([
                project_contributor::Column::ProjectId,
                project_contributor::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}
