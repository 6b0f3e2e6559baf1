pub mod auth;
pub mod event;
pub mod leaderboard;
pub mod project;
pub mod shared;
pub mod task;
pub mod user;
