//! The permission-check collaborator.
//!
//! Every request must pass two gates before any store access: Basic-auth
//! verification (see [`crate::auth`]) and a positive decision from the
//! [`AccessPolicy`] installed in the application state. The policy is an
//! injectable strategy scoped to the principal, the resource kind, and the
//! action derived from the HTTP method.

use std::{collections::HashSet, str::FromStr};

use axum::{
  extract::FromRequestParts,
  http::{Method, request::Parts},
};
use castbook_core::store::ActorStore;

use crate::{AppState, auth::Principal, auth::verify_auth, error::Error};

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// The resource kind a request targets. Only actors exist today; the policy
/// interface keeps the dimension so new resources slot in without changing
/// implementors' signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Actor,
}

impl Resource {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Actor => "actor",
    }
  }
}

/// What a request wants to do with a resource, derived from the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  View,
  Add,
  Change,
  Delete,
}

impl Action {
  /// `None` for methods the API never routes (e.g. `TRACE`).
  pub fn from_method(method: &Method) -> Option<Self> {
    match *method {
      Method::GET | Method::HEAD => Some(Self::View),
      Method::POST => Some(Self::Add),
      Method::PUT | Method::PATCH => Some(Self::Change),
      Method::DELETE => Some(Self::Delete),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::View => "view",
      Self::Add => "add",
      Self::Change => "change",
      Self::Delete => "delete",
    }
  }
}

impl FromStr for Action {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "view" => Ok(Self::View),
      "add" => Ok(Self::Add),
      "change" => Ok(Self::Change),
      "delete" => Ok(Self::Delete),
      other => Err(format!("unknown action: {other:?}")),
    }
  }
}

// ─── Policy trait ────────────────────────────────────────────────────────────

/// External authorization decision point consulted once per request, after
/// authentication and before any store access.
pub trait AccessPolicy: Send + Sync {
  fn allows(
    &self,
    principal: &Principal,
    resource: Resource,
    action: Action,
  ) -> bool;
}

/// Permit everything — the default when no `permissions` list is configured.
pub struct GrantAll;

impl AccessPolicy for GrantAll {
  fn allows(&self, _: &Principal, _: Resource, _: Action) -> bool { true }
}

/// Permit a fixed set of actions regardless of principal, e.g. a read-only
/// deployment configured with `permissions = ["view"]`.
pub struct StaticPolicy {
  allowed: HashSet<Action>,
}

impl StaticPolicy {
  pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
    Self { allowed: actions.into_iter().collect() }
  }

  /// Parse action names from configuration.
  pub fn from_names<I, T>(names: I) -> Result<Self, String>
  where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
  {
    let allowed = names
      .into_iter()
      .map(|n| n.as_ref().parse())
      .collect::<Result<HashSet<_>, _>>()?;
    Ok(Self { allowed })
  }
}

impl AccessPolicy for StaticPolicy {
  fn allows(&self, _: &Principal, _: Resource, action: Action) -> bool {
    self.allowed.contains(&action)
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's arguments means the request was authenticated and
/// the policy approved it. Runs before any body extraction, so rejected
/// requests never touch the store.
pub struct Authorized(pub Principal);

impl<S> FromRequestParts<AppState<S>> for Authorized
where
  S: ActorStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let principal = verify_auth(&parts.headers, &state.auth)?;

    let action =
      Action::from_method(&parts.method).ok_or(Error::Forbidden)?;
    if !state.policy.allows(&principal, Resource::Actor, action) {
      tracing::debug!(
        user = %principal.username,
        action = action.as_str(),
        "policy denied request"
      );
      return Err(Error::Forbidden);
    }

    Ok(Authorized(principal))
  }
}
