//! Actor — the sole entity of the Castbook registry.
//!
//! An actor is a flat record: a required name plus an optional birthday and
//! an optional nationality drawn from a closed set of codes. Ids are assigned
//! by the store on creation and never change.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Date format accepted for the `birthday` field, both over HTTP and in CSV
/// import files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Nationality ─────────────────────────────────────────────────────────────

/// Recognised nationality codes. The set is closed: values outside it are
/// rejected at construction and, as a second line of defence, by a CHECK
/// constraint in the store schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Nationality {
  Usa,
  Brazil,
}

impl Nationality {
  pub const ALL: [Nationality; 2] = [Self::Usa, Self::Brazil];

  /// The code stored in the `nationality` column and used in JSON bodies.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Usa => "USA",
      Self::Brazil => "BRAZIL",
    }
  }
}

impl FromStr for Nationality {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "USA" => Ok(Self::Usa),
      "BRAZIL" => Ok(Self::Brazil),
      other => Err(Error::UnknownNationality(other.to_owned())),
    }
  }
}

impl fmt::Display for Nationality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Per-field validation failures, keyed by field name.
///
/// Serialises to `{"name": ["name is required"], ...}` so clients can see
/// every offending field in one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.entry(field).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Field names with at least one failure.
  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.0.keys().copied()
  }

  /// `Ok(value)` when no failures were collected, `Err(self)` otherwise.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// A persisted actor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  /// Store-assigned on creation; immutable and never reused.
  pub actor_id:    Uuid,
  pub name:        String,
  pub birthday:    Option<NaiveDate>,
  pub nationality: Option<Nationality>,
}

impl Actor {
  /// Check the required-name invariant on an already-assembled record, e.g.
  /// after folding a patch into it.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if self.name.trim().is_empty() {
      errors.push("name", "name is required");
    }
    errors.into_result(())
  }
}

// ─── NewActor ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ActorStore::create_actor`] and full-replacement
/// updates. The id is always assigned by the store; it is not accepted from
/// callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
  pub name:        String,
  pub birthday:    Option<NaiveDate>,
  pub nationality: Option<Nationality>,
}

impl NewActor {
  /// Convenience constructor with the optional fields unset.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      birthday:    None,
      nationality: None,
    }
  }

  /// Check the required-name invariant. Typed fields cannot hold an invalid
  /// date or nationality, so the name is the only thing left to check.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if self.name.trim().is_empty() {
      errors.push("name", "name is required");
    }
    errors.into_result(())
  }

  /// Build a `NewActor` from raw string fields, collecting one entry per
  /// offending field: missing or empty name, malformed date, unknown
  /// nationality code.
  pub fn from_fields(
    name: Option<&str>,
    birthday: Option<&str>,
    nationality: Option<&str>,
  ) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match name {
      Some(n) if !n.trim().is_empty() => n.to_owned(),
      _ => {
        errors.push("name", "name is required");
        String::new()
      }
    };

    let birthday = match birthday {
      Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
          errors.push("birthday", format!("{raw:?} is not a YYYY-MM-DD date"));
          None
        }
      },
      None => None,
    };

    let nationality = match nationality {
      Some(raw) => match raw.parse::<Nationality>() {
        Ok(code) => Some(code),
        Err(_) => {
          errors.push(
            "nationality",
            format!("{raw:?} is not one of USA, BRAZIL"),
          );
          None
        }
      },
      None => None,
    };

    errors.into_result(Self { name, birthday, nationality })
  }
}

// ─── ActorPatch ──────────────────────────────────────────────────────────────

/// Partial update applied by [`crate::store::ActorStore::patch_actor`].
/// Absent fields are left unchanged; a patch cannot clear an optional field
/// (use a full replacement for that).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorPatch {
  pub name:        Option<String>,
  pub birthday:    Option<NaiveDate>,
  pub nationality: Option<Nationality>,
}

impl ActorPatch {
  /// Build a patch from raw string fields, collecting per-field failures the
  /// same way [`NewActor::from_fields`] does. A present-but-empty name is
  /// rejected; an absent one is simply not part of the patch.
  pub fn from_fields(
    name: Option<&str>,
    birthday: Option<&str>,
    nationality: Option<&str>,
  ) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match name {
      Some(n) if n.trim().is_empty() => {
        errors.push("name", "name must not be empty");
        None
      }
      Some(n) => Some(n.to_owned()),
      None => None,
    };

    let birthday = match birthday {
      Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
          errors.push("birthday", format!("{raw:?} is not a YYYY-MM-DD date"));
          None
        }
      },
      None => None,
    };

    let nationality = match nationality {
      Some(raw) => match raw.parse::<Nationality>() {
        Ok(code) => Some(code),
        Err(_) => {
          errors.push(
            "nationality",
            format!("{raw:?} is not one of USA, BRAZIL"),
          );
          None
        }
      },
      None => None,
    };

    errors.into_result(Self { name, birthday, nationality })
  }

  /// Fold this patch into an existing record.
  pub fn apply_to(self, actor: &mut Actor) {
    if let Some(name) = self.name {
      actor.name = name;
    }
    if let Some(birthday) = self.birthday {
      actor.birthday = Some(birthday);
    }
    if let Some(nationality) = self.nationality {
      actor.nationality = Some(nationality);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nationality_round_trips_through_str() {
    for code in Nationality::ALL {
      assert_eq!(code.as_str().parse::<Nationality>().unwrap(), code);
    }
  }

  #[test]
  fn nationality_rejects_unknown_code() {
    assert!("FRANCE".parse::<Nationality>().is_err());
  }

  #[test]
  fn from_fields_accepts_full_row() {
    let new = NewActor::from_fields(
      Some("Tom Hanks"),
      Some("1956-07-09"),
      Some("USA"),
    )
    .unwrap();
    assert_eq!(new.name, "Tom Hanks");
    assert_eq!(
      new.birthday,
      Some(NaiveDate::from_ymd_opt(1956, 7, 9).unwrap())
    );
    assert_eq!(new.nationality, Some(Nationality::Usa));
  }

  #[test]
  fn from_fields_collects_every_offending_field() {
    let errors =
      NewActor::from_fields(None, Some("not-a-date"), Some("ATLANTIS"))
        .unwrap_err();
    let fields: Vec<_> = errors.fields().collect();
    assert_eq!(fields, ["birthday", "name", "nationality"]);
  }

  #[test]
  fn from_fields_rejects_blank_name() {
    let errors = NewActor::from_fields(Some("   "), None, None).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
  }

  #[test]
  fn patch_leaves_absent_fields_unchanged() {
    let mut actor = Actor {
      actor_id:    Uuid::new_v4(),
      name:        "Fernanda Montenegro".to_owned(),
      birthday:    NaiveDate::from_ymd_opt(1929, 10, 16),
      nationality: Some(Nationality::Brazil),
    };
    let patch =
      ActorPatch::from_fields(None, None, Some("USA")).unwrap();
    patch.apply_to(&mut actor);

    assert_eq!(actor.name, "Fernanda Montenegro");
    assert_eq!(actor.birthday, NaiveDate::from_ymd_opt(1929, 10, 16));
    assert_eq!(actor.nationality, Some(Nationality::Usa));
  }

  #[test]
  fn patch_rejects_empty_name() {
    let errors = ActorPatch::from_fields(Some(""), None, None).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
  }
}
