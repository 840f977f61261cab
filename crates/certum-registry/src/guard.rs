use certum_core::Identity;

use crate::error::RegistryError;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Gates mutating operations to the single registry authority.
///
/// The authority is fixed when the guard is built and cannot be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGuard {
    authority: Identity,
}

impl AccessGuard {
    pub fn new(authority: Identity) -> Self {
        Self { authority }
    }

    /// The identity allowed to issue and revoke.
    pub fn authority(&self) -> Identity {
        self.authority
    }

    /// Compare a caller against the authority.
    pub fn check(&self, caller: &Identity) -> Access {
        if *caller == self.authority {
            Access::Allowed
        } else {
            Access::Denied
        }
    }

    /// Like [`check`](Self::check), as a `Result` for `?` propagation.
    pub fn authorize(&self, caller: &Identity) -> Result<(), RegistryError> {
        match self.check(caller) {
            Access::Allowed => Ok(()),
            Access::Denied => {
                tracing::warn!(caller = %caller, "mutation rejected: caller is not the authority");
                Err(RegistryError::Unauthorized { caller: *caller })
            }
        }
    }
}
