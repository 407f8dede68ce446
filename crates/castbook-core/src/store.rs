//! The `ActorStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `castbook-store-sqlite`).
//! Higher layers (`castbook-server`, `castbook-import`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::actor::{Actor, ActorPatch, NewActor};

/// Abstraction over a Castbook storage backend.
///
/// Conventional CRUD semantics: reads return `Option` for missing ids,
/// updates and deletes report not-found through `None`/`false` rather than an
/// error. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ActorStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new actor and return it with its store-assigned id.
  fn create_actor(
    &self,
    input: NewActor,
  ) -> impl Future<Output = Result<Actor, Self::Error>> + Send + '_;

  /// List all actors.
  fn list_actors(
    &self,
  ) -> impl Future<Output = Result<Vec<Actor>, Self::Error>> + Send + '_;

  /// Retrieve an actor by id. Returns `None` if not found.
  fn get_actor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  /// Replace every field of an existing actor. Returns the updated record,
  /// or `None` if the id does not exist.
  fn replace_actor(
    &self,
    id: Uuid,
    input: NewActor,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  /// Apply a partial update to an existing actor. Returns the updated
  /// record, or `None` if the id does not exist.
  fn patch_actor(
    &self,
    id: Uuid,
    patch: ActorPatch,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  /// Delete an actor. Returns `false` if the id does not exist.
  fn delete_actor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
