//! Certum Core: Identifiers, holder digests, certificate records and
//! lifecycle rules shared by every Certum crate.

pub mod certificate_state;
pub mod config;
pub mod error;
pub mod mutation;
pub mod record;
pub mod types;

pub use certificate_state::{
    CertificateEvent, CertificateState, CertificateStateMachine, Transition,
};
pub use config::{DisclosurePolicy, RegistryPolicy, RevocationMode};
pub use error::CoreError;
pub use mutation::Mutation;
pub use record::{CertificateRecord, NewCertificate, Verification, VerificationCheck};
pub use types::{
    CertificateId, HolderHash, Identity, Timestamp, DIGEST_LEN, ID_LEN, NEVER_EXPIRES,
};
