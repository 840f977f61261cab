//! Certum Registry: Access guard, ledger substrate, record store,
//! verification engine and revocation manager.

pub mod clock;
pub mod engine;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod registry;
pub mod revocation;
pub mod rules;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::VerificationEngine;
pub use error::RegistryError;
pub use guard::{Access, AccessGuard};
pub use ledger::{JournalEntry, Ledger, MemoryLedger, Receipt};
pub use registry::CertificateRegistry;
pub use revocation::RevocationManager;
pub use rules::{Applied, MutationRules};
pub use store::RecordStore;
