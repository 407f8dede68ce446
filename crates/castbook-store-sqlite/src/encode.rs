//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings, nationalities as their code
//! strings, UUIDs as hyphenated lowercase strings.

use castbook_core::actor::{Actor, DATE_FORMAT, Nationality};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Nationality ─────────────────────────────────────────────────────────────

pub fn encode_nationality(code: Nationality) -> &'static str { code.as_str() }

pub fn decode_nationality(s: &str) -> Result<Nationality> {
  Ok(s.parse::<Nationality>()?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from an `actors` row.
pub struct RawActor {
  pub actor_id:    String,
  pub name:        String,
  pub birthday:    Option<String>,
  pub nationality: Option<String>,
}

impl RawActor {
  pub fn into_actor(self) -> Result<Actor> {
    Ok(Actor {
      actor_id:    decode_uuid(&self.actor_id)?,
      name:        self.name,
      birthday:    self.birthday.as_deref().map(decode_date).transpose()?,
      nationality: self
        .nationality
        .as_deref()
        .map(decode_nationality)
        .transpose()?,
    })
  }
}
