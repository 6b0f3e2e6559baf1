use serde_json::json;

use crate::common::{TestApp, routes};

fn register_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "securepass",
        "first_name": "Alice",
        "last_name": "Wonder",
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &register_body("alice"))
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;
        let body = register_body("alice");

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(
            first.status, 201,
            "First registration failed: {}",
            first.text
        );

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;
        let mut body = register_body("alice");
        body["password"] = json!("short");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_username() {
        let app = TestApp::spawn().await;
        let mut body = register_body("alice");
        body["username"] = json!("no spaces!");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_email() {
        let app = TestApp::spawn().await;
        let mut body = register_body("alice");
        body["email"] = json!("not-an-email");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_unknown_skill_level() {
        let app = TestApp::spawn().await;
        let mut body = register_body("alice");
        body["skill_level"] = json!("wizard");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_login_and_receives_token() {
        let app = TestApp::spawn().await;

        let reg = app
            .post_without_token(routes::REGISTER, &register_body("alice"))
            .await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["is_admin"], false);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        app.post_without_token(routes::REGISTER, &register_body("alice"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_username_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "ghost", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod logout {
    use super::*;

    #[tokio::test]
    async fn logout_with_a_valid_token_succeeds() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.post_with_token(routes::LOGOUT, &json!({}), &token).await;

        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn logout_without_a_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::LOGOUT, &json!({})).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn profile_returns_the_current_user_without_the_password() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.get_with_token(routes::PROFILE, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["is_member"], true);
        assert_eq!(res.body["points"], 0);
        assert_eq!(res.body["skill_level"], "beginner");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn profile_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROFILE).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn user_can_update_their_own_profile() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(
                routes::PROFILE,
                &json!({"first_name": "Alicia", "skill_level": "advanced"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["first_name"], "Alicia");
        assert_eq!(res.body["skill_level"], "advanced");
        // Untouched fields keep their values.
        assert_eq!(res.body["last_name"], "User");
    }

    #[tokio::test]
    async fn profile_update_rejects_unknown_skill_levels() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(routes::PROFILE, &json!({"skill_level": "wizard"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod password_change {
    use super::*;

    #[tokio::test]
    async fn user_can_change_their_password_and_login_with_it() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::PASSWORD_CHANGE,
                &json!({"old_password": "securepass", "new_password": "evenbetterpass"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "Password change failed: {}", res.text);

        let old = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;
        assert_eq!(old.status, 401);

        let new = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "evenbetterpass"}),
            )
            .await;
        assert_eq!(new.status, 200);
    }

    #[tokio::test]
    async fn wrong_old_password_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::PASSWORD_CHANGE,
                &json!({"old_password": "wrongpass", "new_password": "evenbetterpass"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn new_password_must_meet_the_length_requirement() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::PASSWORD_CHANGE,
                &json!({"old_password": "securepass", "new_password": "short"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
