// checkout/src/identity.rs

use parking_lot::RwLock;

/// The signed-in customer: a key that scopes local data and the bearer
/// credential sent with backend requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
  pub key: String,
  pub credential: String,
}

impl Identity {
  pub fn new(key: impl Into<String>, credential: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      credential: credential.into(),
    }
  }
}

impl std::fmt::Debug for Identity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Identity")
      .field("key", &self.key)
      .field("credential", &"[REDACTED]")
      .finish()
  }
}

/// Supplies the current identity, if any.
pub trait IdentityProvider: Send + Sync {
  fn current(&self) -> Option<Identity>;
}

/// An in-memory session that can be signed in and out.
#[derive(Debug, Default)]
pub struct SessionIdentity {
  inner: RwLock<Option<Identity>>,
}

impl SessionIdentity {
  pub fn new(identity: Option<Identity>) -> Self {
    Self {
      inner: RwLock::new(identity),
    }
  }

  pub fn signed_in(identity: Identity) -> Self {
    Self::new(Some(identity))
  }

  pub fn sign_in(&self, identity: Identity) {
    *self.inner.write() = Some(identity);
  }

  pub fn sign_out(&self) {
    *self.inner.write() = None;
  }
}

impl IdentityProvider for SessionIdentity {
  fn current(&self) -> Option<Identity> {
    self.inner.read().clone()
  }
}
