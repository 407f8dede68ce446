//! Handlers for the `/actors/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/actors/` | All actors |
//! | `POST`   | `/actors/` | Body: [`ActorPayload`]; 201 + stored actor, or 400 |
//! | `GET`    | `/actors/{id}/` | 404 if not found |
//! | `PUT`    | `/actors/{id}/` | Full replacement |
//! | `PATCH`  | `/actors/{id}/` | Partial update; absent fields unchanged |
//! | `DELETE` | `/actors/{id}/` | 204 on success |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use castbook_core::{
  actor::{Actor, ActorPatch, NewActor},
  store::ActorStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::Error, policy::Authorized};

/// JSON body accepted by `POST`, `PUT`, and `PATCH`.
///
/// All fields arrive as raw strings so validation can report every offending
/// field at once instead of bailing at the first deserialisation failure.
#[derive(Debug, Deserialize)]
pub struct ActorPayload {
  pub name:        Option<String>,
  /// `YYYY-MM-DD`.
  pub birthday:    Option<String>,
  /// One of the recognised codes, e.g. `USA`, `BRAZIL`.
  pub nationality: Option<String>,
}

impl ActorPayload {
  fn to_new_actor(&self) -> Result<NewActor, Error> {
    Ok(NewActor::from_fields(
      self.name.as_deref(),
      self.birthday.as_deref(),
      self.nationality.as_deref(),
    )?)
  }

  fn to_patch(&self) -> Result<ActorPatch, Error> {
    Ok(ActorPatch::from_fields(
      self.name.as_deref(),
      self.birthday.as_deref(),
      self.nationality.as_deref(),
    )?)
  }
}

fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

// ─── Collection ──────────────────────────────────────────────────────────────

/// `GET /actors/`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authorized(_): Authorized,
) -> Result<Json<Vec<Actor>>, Error>
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let actors = state.store.list_actors().await.map_err(store_err)?;
  Ok(Json(actors))
}

/// `POST /actors/` — returns 201 + the stored [`Actor`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authorized(principal): Authorized,
  Json(payload): Json<ActorPayload>,
) -> Result<impl IntoResponse, Error>
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = payload.to_new_actor()?;
  let actor = state.store.create_actor(input).await.map_err(store_err)?;

  tracing::info!(
    user = %principal.username,
    actor_id = %actor.actor_id,
    "actor created"
  );
  Ok((StatusCode::CREATED, Json(actor)))
}

// ─── Item ────────────────────────────────────────────────────────────────────

/// `GET /actors/{id}/`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Authorized(_): Authorized,
  Path(id): Path<Uuid>,
) -> Result<Json<Actor>, Error>
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let actor = state
    .store
    .get_actor(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| Error::NotFound(format!("actor {id} not found")))?;
  Ok(Json(actor))
}

/// `PUT /actors/{id}/` — validate and replace every field.
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Authorized(_): Authorized,
  Path(id): Path<Uuid>,
  Json(payload): Json<ActorPayload>,
) -> Result<Json<Actor>, Error>
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = payload.to_new_actor()?;
  let actor = state
    .store
    .replace_actor(id, input)
    .await
    .map_err(store_err)?
    .ok_or_else(|| Error::NotFound(format!("actor {id} not found")))?;
  Ok(Json(actor))
}

/// `PATCH /actors/{id}/` — validate and apply the named fields only.
pub async fn patch<S>(
  State(state): State<AppState<S>>,
  Authorized(_): Authorized,
  Path(id): Path<Uuid>,
  Json(payload): Json<ActorPayload>,
) -> Result<Json<Actor>, Error>
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let patch = payload.to_patch()?;
  let actor = state
    .store
    .patch_actor(id, patch)
    .await
    .map_err(store_err)?
    .ok_or_else(|| Error::NotFound(format!("actor {id} not found")))?;
  Ok(Json(actor))
}

/// `DELETE /actors/{id}/` — 204 with an empty body on success.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Authorized(principal): Authorized,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, Error>
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = state.store.delete_actor(id).await.map_err(store_err)?;
  if !deleted {
    return Err(Error::NotFound(format!("actor {id} not found")));
  }

  tracing::info!(user = %principal.username, actor_id = %id, "actor deleted");
  Ok(StatusCode::NO_CONTENT)
}
