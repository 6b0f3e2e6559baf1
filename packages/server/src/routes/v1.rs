use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/leaderboard", leaderboard_routes())
        .nest("/projects", project_routes())
        .nest("/tasks", task_routes())
        .nest("/events", event_routes())
        .nest("/attendance", attendance_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::logout))
        .routes(routes!(
            handlers::auth::get_profile,
            handlers::auth::update_profile
        ))
        .routes(routes!(handlers::auth::change_password))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::user::list_users,
            handlers::user::create_user
        ))
        .routes(routes!(
            handlers::user::get_user,
            handlers::user::update_user,
            handlers::user::delete_user
        ))
}

fn leaderboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::leaderboard::get_leaderboard))
}

fn project_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::project::list_projects,
            handlers::project::create_project
        ))
        .routes(routes!(
            handlers::project::get_project,
            handlers::project::update_project,
            handlers::project::delete_project
        ))
        .routes(routes!(
            handlers::project::list_contributors,
            handlers::project::add_contributor
        ))
        .routes(routes!(handlers::project::remove_contributor))
}

fn task_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::task::list_tasks,
            handlers::task::create_task
        ))
        .routes(routes!(
            handlers::task::get_task,
            handlers::task::update_task,
            handlers::task::delete_task
        ))
        .routes(routes!(handlers::task::verify_task))
}

fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::event::list_events,
            handlers::event::create_event
        ))
        .routes(routes!(
            handlers::event::get_event,
            handlers::event::update_event,
            handlers::event::delete_event
        ))
        .routes(routes!(
            handlers::event::list_attendance,
            handlers::event::mark_attendance
        ))
}

fn attendance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::event::my_attendance))
}
