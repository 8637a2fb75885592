//! Shared-secret gate for tool execution
//!
//! Only `tools/call` is gated. `initialize` and `tools/list` stay open so
//! clients can discover the catalog without any credentials.

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::config::AuthConfig;

/// Header carrying the shared secret
pub const SECRET_KEY_HEADER: &str = "x-secret-key";

/// The only gated JSON-RPC method
const GATED_METHOD: &str = "tools/call";

/// Why a gated call was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `x-secret-key` header
    Missing,
    /// Header present but wrong
    Invalid,
}

impl AuthRejection {
    /// Client-facing error message
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "Authentication required for tool execution",
            Self::Invalid => "Invalid authentication for tool execution",
        }
    }
}

/// Outcome of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Request may proceed
    Allow,
    /// Request must be answered with HTTP 401
    Reject(AuthRejection),
}

/// Stateless predicate over the configured secret
#[derive(Debug, Clone)]
pub struct AuthGate {
    require_auth: bool,
    secret_key: Option<String>,
}

impl AuthGate {
    /// Create a gate; an empty secret disables checking
    #[must_use]
    pub fn new(require_auth: bool, secret_key: Option<String>) -> Self {
        let secret_key = secret_key.filter(|s| !s.is_empty());
        Self {
            require_auth,
            secret_key,
        }
    }

    /// Create a gate from configuration, warning when it is effectively open
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let gate = Self::new(config.require_auth, config.resolve_secret_key());
        if gate.require_auth && gate.secret_key.is_none() {
            warn!("REQUIRE_AUTH is on but SECRET_KEY is empty - tools/call is unauthenticated");
        }
        gate
    }

    /// Whether a secret will actually be checked
    #[must_use]
    pub fn is_enforced(&self) -> bool {
        self.require_auth && self.secret_key.is_some()
    }

    /// Decide whether `method` may run given the raw header bytes.
    ///
    /// Any present header counts as an attempt, even when it is not valid text.
    #[must_use]
    pub fn check(&self, method: &str, provided: Option<&[u8]>) -> AuthDecision {
        if method != GATED_METHOD || !self.require_auth {
            return AuthDecision::Allow;
        }

        let Some(ref expected) = self.secret_key else {
            debug!("Auth required but no secret configured; allowing tool execution");
            return AuthDecision::Allow;
        };

        match provided {
            None => AuthDecision::Reject(AuthRejection::Missing),
            Some(given) if bool::from(given.ct_eq(expected.as_bytes())) => {
                AuthDecision::Allow
            }
            Some(_) => AuthDecision::Reject(AuthRejection::Invalid),
        }
    }
}
