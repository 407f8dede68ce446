//! [`SqliteStore`] — the SQLite implementation of [`ActorStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use castbook_core::{
  actor::{Actor, ActorPatch, NewActor},
  store::ActorStore,
};

use crate::{
  Error, Result,
  encode::{RawActor, encode_date, encode_nationality, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Castbook actor store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write every mutable column of an existing row. Returns `false` if the
  /// id matched nothing.
  async fn write_row(&self, actor: &Actor) -> Result<bool> {
    let id_str          = encode_uuid(actor.actor_id);
    let name            = actor.name.clone();
    let birthday_str    = actor.birthday.map(encode_date);
    let nationality_str =
      actor.nationality.map(encode_nationality).map(str::to_owned);

    let changed = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE actors SET name = ?2, birthday = ?3, nationality = ?4
           WHERE actor_id = ?1",
          rusqlite::params![id_str, name, birthday_str, nationality_str],
        )?;
        Ok(changed)
      })
      .await?;

    Ok(changed > 0)
  }
}

// ─── ActorStore impl ─────────────────────────────────────────────────────────

impl ActorStore for SqliteStore {
  type Error = Error;

  async fn create_actor(&self, input: NewActor) -> Result<Actor> {
    input.validate().map_err(castbook_core::Error::from)?;

    let actor = Actor {
      actor_id:    Uuid::new_v4(),
      name:        input.name,
      birthday:    input.birthday,
      nationality: input.nationality,
    };

    let id_str          = encode_uuid(actor.actor_id);
    let name            = actor.name.clone();
    let birthday_str    = actor.birthday.map(encode_date);
    let nationality_str =
      actor.nationality.map(encode_nationality).map(str::to_owned);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO actors (actor_id, name, birthday, nationality)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, birthday_str, nationality_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(actor)
  }

  async fn list_actors(&self) -> Result<Vec<Actor>> {
    let raws: Vec<RawActor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT actor_id, name, birthday, nationality FROM actors",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawActor {
              actor_id:    row.get(0)?,
              name:        row.get(1)?,
              birthday:    row.get(2)?,
              nationality: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActor::into_actor).collect()
  }

  async fn get_actor(&self, id: Uuid) -> Result<Option<Actor>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawActor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT actor_id, name, birthday, nationality FROM actors
               WHERE actor_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawActor {
                  actor_id:    row.get(0)?,
                  name:        row.get(1)?,
                  birthday:    row.get(2)?,
                  nationality: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActor::into_actor).transpose()
  }

  async fn replace_actor(
    &self,
    id: Uuid,
    input: NewActor,
  ) -> Result<Option<Actor>> {
    input.validate().map_err(castbook_core::Error::from)?;

    let actor = Actor {
      actor_id:    id,
      name:        input.name,
      birthday:    input.birthday,
      nationality: input.nationality,
    };

    Ok(self.write_row(&actor).await?.then_some(actor))
  }

  async fn patch_actor(
    &self,
    id: Uuid,
    patch: ActorPatch,
  ) -> Result<Option<Actor>> {
    let mut actor = match self.get_actor(id).await? {
      Some(a) => a,
      None => return Ok(None),
    };

    patch.apply_to(&mut actor);
    actor.validate().map_err(castbook_core::Error::from)?;

    Ok(self.write_row(&actor).await?.then_some(actor))
  }

  async fn delete_actor(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let deleted = conn.execute(
          "DELETE FROM actors WHERE actor_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(deleted)
      })
      .await?;

    Ok(deleted > 0)
  }
}
