//! REST API server for the Castbook actor registry.
//!
//! Exposes an axum [`Router`] backed by any [`ActorStore`]. Every endpoint is
//! gated by HTTP Basic auth and the injectable [`policy::AccessPolicy`]
//! collaborator before any store access happens.

pub mod actors;
pub mod auth;
pub mod error;
pub mod policy;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use castbook_core::store::ActorStore;
use serde::Deserialize;

use auth::AuthConfig;
use policy::AccessPolicy;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Optional allow-list of actions (`view`, `add`, `change`, `delete`).
  /// Absent means every action is permitted.
  #[serde(default)]
  pub permissions:        Option<Vec<String>>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ActorStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
  pub policy: Arc<dyn AccessPolicy>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the actor resource.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/actors/",
      get(actors::list::<S>).post(actors::create::<S>),
    )
    .route(
      "/actors/{id}/",
      get(actors::get_one::<S>)
        .put(actors::replace::<S>)
        .patch(actors::patch::<S>)
        .delete(actors::delete::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use castbook_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;
  use crate::policy::{Action, GrantAll, StaticPolicy};

  async fn make_state_with_policy(
    password: &str,
    policy: Arc<dyn AccessPolicy>,
  ) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store: Arc::new(store),
      config: Arc::new(ServerConfig {
        host:               "127.0.0.1".to_string(),
        port:               8000,
        store_path:         PathBuf::from(":memory:"),
        auth_username:      "user".to_string(),
        auth_password_hash: hash.clone(),
        permissions:        None,
      }),
      auth: Arc::new(AuthConfig {
        username:      "user".to_string(),
        password_hash: hash,
      }),
      policy,
    }
  }

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    make_state_with_policy(password, Arc::new(GrantAll)).await
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  /// Authenticated request with a JSON body (or none).
  async fn oneshot_authed(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> axum::response::Response {
    let auth = auth_header("user", "secret");
    let mut headers = vec![(header::AUTHORIZATION, auth.clone())];
    let body_str = match body {
      Some(v) => {
        headers.push((
          header::CONTENT_TYPE,
          "application/json".to_string(),
        ));
        v.to_string()
      }
      None => String::new(),
    };
    let header_refs: Vec<(header::HeaderName, &str)> =
      headers.iter().map(|(k, v)| (k.clone(), v.as_str())).collect();
    oneshot_raw(state, method, uri, header_refs, &body_str).await
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Auth ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let state = make_state("secret").await;

    let resp = oneshot_raw(state.clone(), "GET", "/actors/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let resp = oneshot_raw(
      state,
      "DELETE",
      &format!("/actors/{}/", Uuid::new_v4()),
      vec![],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn unauthenticated_post_never_reaches_the_store() {
    let state = make_state("secret").await;

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/actors/",
      vec![(header::CONTENT_TYPE, "application/json")],
      &json!({ "name": "Tom Hanks" }).to_string(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let list = oneshot_authed(state, "GET", "/actors/", None).await;
    assert_eq!(json_body(list).await, json!([]));
  }

  #[tokio::test]
  async fn wrong_password_returns_401() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "wrong");
    let resp  = oneshot_raw(
      state,
      "GET",
      "/actors/",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Policy ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn view_only_policy_forbids_writes() {
    let policy = Arc::new(StaticPolicy::new([Action::View]));
    let state  = make_state_with_policy("secret", policy).await;

    let resp = oneshot_authed(
      state.clone(),
      "POST",
      "/actors/",
      Some(json!({ "name": "Tom Hanks" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Reads still work, and the rejected write left nothing behind.
    let list = oneshot_authed(state, "GET", "/actors/", None).await;
    assert_eq!(list.status(), StatusCode::OK);
    assert_eq!(json_body(list).await, json!([]));
  }

  // ── Collection ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_empty_store_returns_empty_array() {
    let state = make_state("secret").await;
    let resp  = oneshot_authed(state, "GET", "/actors/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn create_returns_201_with_assigned_id() {
    let state = make_state("secret").await;

    let resp = oneshot_authed(
      state.clone(),
      "POST",
      "/actors/",
      Some(json!({
        "name":        "Tom Hanks",
        "birthday":    "1956-07-09",
        "nationality": "USA",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created = json_body(resp).await;
    assert_eq!(created["name"], "Tom Hanks");
    assert_eq!(created["birthday"], "1956-07-09");
    assert_eq!(created["nationality"], "USA");
    let id = created["actor_id"].as_str().unwrap().to_string();

    // Round-trip: fetching by id returns field-identical data.
    let fetched =
      oneshot_authed(state, "GET", &format!("/actors/{id}/"), None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(json_body(fetched).await, created);
  }

  #[tokio::test]
  async fn create_without_name_returns_400_and_adds_nothing() {
    let state = make_state("secret").await;

    let resp = oneshot_authed(
      state.clone(),
      "POST",
      "/actors/",
      Some(json!({ "birthday": "1956-07-09" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["errors"]["name"].is_array(), "body: {body}");

    let list = oneshot_authed(state, "GET", "/actors/", None).await;
    assert_eq!(json_body(list).await, json!([]));
  }

  #[tokio::test]
  async fn create_with_unknown_nationality_returns_400() {
    let state = make_state("secret").await;

    let resp = oneshot_authed(
      state.clone(),
      "POST",
      "/actors/",
      Some(json!({ "name": "Poseidon", "nationality": "ATLANTIS" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["errors"]["nationality"].is_array(), "body: {body}");

    let list = oneshot_authed(state, "GET", "/actors/", None).await;
    assert_eq!(json_body(list).await, json!([]));
  }

  #[tokio::test]
  async fn create_with_malformed_birthday_returns_400() {
    let state = make_state("secret").await;

    let resp = oneshot_authed(
      state,
      "POST",
      "/actors/",
      Some(json!({ "name": "Tom Hanks", "birthday": "not-a-date" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["errors"]["birthday"].is_array(), "body: {body}");
  }

  #[tokio::test]
  async fn create_reports_every_offending_field_at_once() {
    let state = make_state("secret").await;

    let resp = oneshot_authed(
      state,
      "POST",
      "/actors/",
      Some(json!({ "birthday": "07/09/1956", "nationality": "ATLANTIS" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    for field in ["name", "birthday", "nationality"] {
      assert!(body["errors"][field].is_array(), "missing {field}: {body}");
    }
  }

  // ── Item ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_nonexistent_returns_404() {
    let state = make_state("secret").await;
    let resp  = oneshot_authed(
      state,
      "GET",
      &format!("/actors/{}/", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_with_malformed_id_returns_400() {
    let state = make_state("secret").await;
    let resp  =
      oneshot_authed(state, "GET", "/actors/not-a-uuid/", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn put_replaces_every_field() {
    let state = make_state("secret").await;

    let created = json_body(
      oneshot_authed(
        state.clone(),
        "POST",
        "/actors/",
        Some(json!({
          "name":        "Tom Hanks",
          "birthday":    "1956-07-09",
          "nationality": "USA",
        })),
      )
      .await,
    )
    .await;
    let id = created["actor_id"].as_str().unwrap().to_string();

    let resp = oneshot_authed(
      state.clone(),
      "PUT",
      &format!("/actors/{id}/"),
      Some(json!({ "name": "Thomas Jeffrey Hanks" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await;
    assert_eq!(updated["name"], "Thomas Jeffrey Hanks");
    assert_eq!(updated["birthday"], Value::Null);
    assert_eq!(updated["nationality"], Value::Null);

    let fetched =
      oneshot_authed(state, "GET", &format!("/actors/{id}/"), None).await;
    assert_eq!(json_body(fetched).await, updated);
  }

  #[tokio::test]
  async fn patch_updates_named_field_and_keeps_the_rest() {
    let state = make_state("secret").await;

    let created = json_body(
      oneshot_authed(
        state.clone(),
        "POST",
        "/actors/",
        Some(json!({
          "name":        "Fernanda Montenegro",
          "birthday":    "1929-10-16",
          "nationality": "BRAZIL",
        })),
      )
      .await,
    )
    .await;
    let id = created["actor_id"].as_str().unwrap().to_string();

    let resp = oneshot_authed(
      state.clone(),
      "PATCH",
      &format!("/actors/{id}/"),
      Some(json!({ "nationality": "USA" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched = json_body(
      oneshot_authed(state, "GET", &format!("/actors/{id}/"), None).await,
    )
    .await;
    assert_eq!(fetched["nationality"], "USA");
    assert_eq!(fetched["name"], "Fernanda Montenegro");
    assert_eq!(fetched["birthday"], "1929-10-16");
  }

  #[tokio::test]
  async fn patch_nonexistent_returns_404() {
    let state = make_state("secret").await;
    let resp  = oneshot_authed(
      state,
      "PATCH",
      &format!("/actors/{}/", Uuid::new_v4()),
      Some(json!({ "name": "Nobody" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_then_get_returns_404() {
    let state = make_state("secret").await;

    let created = json_body(
      oneshot_authed(
        state.clone(),
        "POST",
        "/actors/",
        Some(json!({ "name": "Tom Hanks" })),
      )
      .await,
    )
    .await;
    let id = created["actor_id"].as_str().unwrap().to_string();

    let del = oneshot_authed(
      state.clone(),
      "DELETE",
      &format!("/actors/{id}/"),
      None,
    )
    .await;
    assert_eq!(del.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(del.into_body(), usize::MAX)
      .await
      .unwrap();
    assert!(bytes.is_empty());

    let fetched =
      oneshot_authed(state, "GET", &format!("/actors/{id}/"), None).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_nonexistent_returns_404() {
    let state = make_state("secret").await;
    let resp  = oneshot_authed(
      state,
      "DELETE",
      &format!("/actors/{}/", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
