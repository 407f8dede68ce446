//! CSV bulk import for the Castbook actor registry.
//!
//! A one-shot, strictly sequential loader: one `create` per data row, in file
//! order, aborting on the first bad row. There is no rollback of rows already
//! written and no dedup — re-running the same file duplicates records.
//!
//! Expected file shape (UTF-8, header row required):
//!
//! ```csv
//! name,birthday,nationality
//! Tom Hanks,1956-07-09,USA
//! Fernanda Montenegro,1929-10-16,BRAZIL
//! ```

use std::io::{Read, Write};

use castbook_core::{
  actor::{DATE_FORMAT, Nationality, NewActor},
  store::ActorStore,
};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A fatal import failure. Rows are 1-based data rows (the header is row 0).
#[derive(Debug, Error)]
pub enum ImportError {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("row {row}: {value:?} is not a YYYY-MM-DD date: {source}")]
  BadDate {
    row:    usize,
    value:  String,
    source: chrono::ParseError,
  },

  #[error("row {row}: {source}")]
  BadNationality {
    row:    usize,
    source: castbook_core::Error,
  },

  #[error("row {row}: store rejected record: {source}")]
  Store {
    row:    usize,
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = ImportError> = std::result::Result<T, E>;

// ─── Input row ───────────────────────────────────────────────────────────────

/// One CSV data row; column names must match the header.
#[derive(Debug, Deserialize)]
struct CsvRow {
  name:        String,
  birthday:    String,
  nationality: String,
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
  pub created: usize,
}

// ─── Import loop ─────────────────────────────────────────────────────────────

/// Read CSV records from `reader` and create one actor per row through
/// `store`, echoing each name to `out` as a progress notice and a single
/// confirmation line after the last row.
///
/// The first error aborts the run; rows created before it stay committed.
pub async fn import_actors<S, R, W>(
  store: &S,
  reader: R,
  out: &mut W,
) -> Result<ImportReport>
where
  S: ActorStore,
  R: Read,
  W: Write,
{
  let mut csv_reader = csv::Reader::from_reader(reader);
  let mut created = 0usize;

  for (idx, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
    let row = idx + 1;
    let CsvRow { name, birthday, nationality } = record?;

    let birthday = NaiveDate::parse_from_str(&birthday, DATE_FORMAT)
      .map_err(|source| ImportError::BadDate {
        row,
        value: birthday.clone(),
        source,
      })?;

    let nationality = nationality
      .parse::<Nationality>()
      .map_err(|source| ImportError::BadNationality { row, source })?;

    writeln!(out, "{name}")?;

    store
      .create_actor(NewActor {
        name,
        birthday: Some(birthday),
        nationality: Some(nationality),
      })
      .await
      .map_err(|e| ImportError::Store { row, source: Box::new(e) })?;

    created += 1;
  }

  writeln!(out, "actors imported successfully!")?;
  Ok(ImportReport { created })
}
