use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn members_are_ranked_by_points_descending() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin_user("boss", "securepass").await;
    app.create_member(&admin, "bronze", 100).await;
    app.create_member(&admin, "gold", 300).await;
    app.create_member(&admin, "silver", 200).await;

    let res = app.get_with_token(routes::LEADERBOARD, &admin).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["period"], "all_time");

    let data = res.body["data"].as_array().unwrap();
    let usernames: Vec<&str> = data
        .iter()
        .map(|e| e["username"].as_str().unwrap())
        .collect();
    // The admin helper account is a member with 0 points, so it trails.
    assert_eq!(usernames, vec!["gold", "silver", "bronze", "boss"]);
    assert_eq!(data[0]["rank"], 1);
    assert_eq!(data[1]["rank"], 2);
    assert_eq!(data[2]["rank"], 3);
}

#[tokio::test]
async fn ties_are_broken_alphabetically() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin_user("zed_admin", "securepass").await;
    app.create_member(&admin, "beta", 100).await;
    app.create_member(&admin, "alpha", 100).await;

    let res = app.get_with_token(routes::LEADERBOARD, &admin).await;

    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data[0]["username"], "alpha");
    assert_eq!(data[1]["username"], "beta");
}

#[tokio::test]
async fn non_members_are_excluded() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin_user("boss", "securepass").await;
    let id = app.create_member(&admin, "lurker", 999).await;
    app.patch_with_token(&routes::user(id), &json!({"is_member": false}), &admin)
        .await;

    let res = app.get_with_token(routes::LEADERBOARD, &admin).await;

    let data = res.body["data"].as_array().unwrap();
    assert!(data.iter().all(|e| e["username"] != "lurker"));
}

#[tokio::test]
async fn limit_caps_the_number_of_entries() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin_user("boss", "securepass").await;
    for i in 0..5 {
        app.create_member(&admin, &format!("member{i}"), i * 10).await;
    }

    let res = app
        .get_with_token(&format!("{}?limit=2", routes::LEADERBOARD), &admin)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_period_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .get_with_token(&format!("{}?period=daily", routes::LEADERBOARD), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn requested_period_is_echoed() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .get_with_token(&format!("{}?period=weekly", routes::LEADERBOARD), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["period"], "weekly");
}
