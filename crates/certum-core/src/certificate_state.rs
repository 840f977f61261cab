use std::fmt;

use crate::error::CoreError;

/// Lifecycle states of a certificate record.
///
/// Expiry is not a state: it is evaluated against the clock at
/// verification time and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateState {
    /// No record exists under the identifier.
    Unissued,
    /// Issued and not revoked.
    Active,
    /// Permanently revoked. Final state.
    Revoked,
}

impl fmt::Display for CertificateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unissued => write!(f, "Unissued"),
            Self::Active => write!(f, "Active"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Events that trigger certificate state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateEvent {
    /// The authority issues a certificate under a fresh identifier.
    Issue,
    /// The authority revokes the certificate.
    Revoke,
}

/// Outcome of an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: CertificateState,
    /// False when the event was accepted without changing state.
    pub changed: bool,
}

/// Certificate lifecycle rules.
///
/// Valid transitions:
/// - Unissued → Active (Issue)
/// - Active → Revoked (Revoke)
/// - Revoked → Revoked (Revoke, no change)
pub struct CertificateStateMachine;

impl CertificateStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(
        current: CertificateState,
        event: CertificateEvent,
    ) -> Result<Transition, CoreError> {
        let transition = match (current, event) {
            (CertificateState::Unissued, CertificateEvent::Issue) => Transition {
                state: CertificateState::Active,
                changed: true,
            },
            (CertificateState::Active, CertificateEvent::Revoke) => Transition {
                state: CertificateState::Revoked,
                changed: true,
            },
            (CertificateState::Revoked, CertificateEvent::Revoke) => Transition {
                state: CertificateState::Revoked,
                changed: false,
            },
            _ => {
                let target = match event {
                    CertificateEvent::Issue => CertificateState::Active,
                    CertificateEvent::Revoke => CertificateState::Revoked,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %transition.state,
            event = ?event,
            changed = transition.changed,
            "certificate state transition"
        );

        Ok(transition)
    }
}
