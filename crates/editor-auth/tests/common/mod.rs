//! In-process stub of the auth endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

pub const PASSWORD: &str = "correct horse";
pub const MALFORMED_EMAIL: &str = "garbage@example.com";
pub const TAKEN_EMAIL: &str = "taken@example.com";
pub const NULL_USER_EMAIL: &str = "null-user@example.com";
pub const EMPTY_TOKEN_EMAIL: &str = "empty-token@example.com";

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(Json(creds): Json<Credentials>) -> Response {
    if creds.email == MALFORMED_EMAIL {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    if creds.email == NULL_USER_EMAIL {
        return Json(json!({ "token": "t-1", "user": null })).into_response();
    }
    if creds.email == EMPTY_TOKEN_EMAIL {
        return Json(json!({ "token": "", "user": { "_id": "user-2" } })).into_response();
    }
    if creds.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    Json(json!({
        "message": "Login successful",
        "token": format!("token-for-{}", creds.email),
        "user": { "_id": "user-1", "email": creds.email },
    }))
    .into_response()
}

async fn signup(Json(creds): Json<Credentials>) -> Response {
    if creds.email == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "User already exists" })),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User created",
            "user": { "email": creds.email },
        })),
    )
        .into_response()
}

/// Start the stub and return its base URL.
pub async fn spawn_auth_stub() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
