mod common;
use axum::http::StatusCode;
use ludus::model::entity::UserEntity;
use ludus::web::middlewares::AUTH_TOKEN;
use tower_cookies::cookie::SameSite;

use crate::common::{
    Action, Flow, setup_server, setup_test_db, signin_action, signin_admin_action, signup_action,
};

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_signup_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(
            signup_action("foobar", "foobaz")
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
                    assert_eq!(cookie.path(), Some("/"));
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_body(|body| {
                    let ent: UserEntity = serde_json::from_str(body).expect("Invalid body format");
                    assert_eq!(ent.username(), "foobar");
                })
                .with_expect(StatusCode::OK),
        )
        // try to signup twice
        .step(signup_action("foobar", "foobaz").with_expect(StatusCode::CONFLICT))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_signin_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("SIGNINTEST", "SIGNINTEST").with_save_cookies(false))
        .step(
            signin_action("SIGNINTEST", "SIGNINTEST")
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
                    assert_eq!(cookie.path(), Some("/"));
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_body(|body| {
                    let ent: UserEntity = serde_json::from_str(body).expect("Invalid JSON format");
                    assert_eq!(ent.username(), "SIGNINTEST");
                })
                .with_expect(StatusCode::OK)
                .with_clear_cookies(true),
        )
        // wrong credentials
        .step(
            signin_action("SIGNINTEST", "WRONGPASSWORD")
                .with_save_cookies(false)
                .with_clear_cookies(true)
                .assert_body(|body| {
                    assert!(body.contains("Authentication error"));
                })
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        // non-existing account
        .step(
            signin_action("nonexisting", "nvm")
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_body(|body| assert!(body.contains("Authentication error"))),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_user_list_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signup_action("FOOBAR", "FOOBAZ").with_save_cookies(true))
        // try to request without admin perms
        .step(
            Action::new("user_list", "GET", "/api/v1/account/page")
                .assert_body(|body| {
                    assert!(body.contains("error") || body.contains("Admin"));
                })
                .with_param("limit", "5")
                .with_param("offset", "0")
                .with_expect(StatusCode::FORBIDDEN)
                .with_save_cookies(true),
        )
        // acquire admin account
        .step(signin_admin_action())
        .step(
            Action::new("user_list", "GET", "/api/v1/account/page")
                .with_param("limit", "5")
                .with_param("offset", "0")
                .assert_body(|body| {
                    assert!(body.contains("total"));
                    assert!(body.contains("items"));
                })
                .with_expect(StatusCode::OK),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
#[ignore = "needs a postgres server (TEST_DATABASE_ADMIN_URL)"]
async fn route_user_delete_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(
            signup_action("FOOBAR", "FOOBAZ")
                .with_save_cookies(false)
                .with_save_as("foobar"),
        )
        .step(
            signup_action("FOOBAZ", "FOOBAR")
                .with_save_cookies(true)
                .with_save_as("foobaz"),
        )
        // we can't allow everybody to delete anybody ;D
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| {
                    let foobar = ctx.get_json::<UserEntity>("foobar");
                    format!("/api/v1/account/{}", foobar.id())
                })
                .with_expect(StatusCode::FORBIDDEN)
                .assert_body(|body| {
                    assert!(body.contains("error") || body.contains("Admin"));
                }),
        )
        // self deletion is allowed
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| {
                    let foobaz = ctx.get_json::<UserEntity>("foobaz");
                    format!("/api/v1/account/{}", foobaz.id())
                })
                .with_expect(StatusCode::OK),
        )
        .step(signin_admin_action())
        // even admin cannot delete the user which doesn't exist :)
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| {
                    let foobaz = ctx.get_json::<UserEntity>("foobaz");
                    format!("/api/v1/account/{}", foobaz.id())
                })
                .with_expect(StatusCode::NOT_FOUND),
        )
        // admin can delete every user he wants
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| {
                    let foobar = ctx.get_json::<UserEntity>("foobar");
                    format!("/api/v1/account/{}", foobar.id())
                })
                .with_expect(StatusCode::OK),
        )
        .run(&mut server, pool)
        .await;
}
