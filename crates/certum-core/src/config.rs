use serde::{Deserialize, Serialize};

/// What a failed verification discloses about an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisclosurePolicy {
    /// Title, issuer and timestamps are returned whenever the record exists.
    #[default]
    Full,
    /// Descriptive fields are returned only for a valid verdict.
    ValidOnly,
}

/// How revoking an already revoked certificate is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevocationMode {
    /// Accepted without error or state change.
    #[default]
    Idempotent,
    /// Rejected as already revoked.
    Strict,
}

/// Registry-wide policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryPolicy {
    #[serde(default)]
    pub disclosure: DisclosurePolicy,
    #[serde(default)]
    pub revocation: RevocationMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RegistryPolicy::default();
        assert_eq!(policy.disclosure, DisclosurePolicy::Full);
        assert_eq!(policy.revocation, RevocationMode::Idempotent);
    }

    #[test]
    fn test_policy_kebab_case() {
        let policy: RegistryPolicy =
            serde_json::from_str(r#"{"disclosure":"valid-only","revocation":"strict"}"#).unwrap();
        assert_eq!(policy.disclosure, DisclosurePolicy::ValidOnly);
        assert_eq!(policy.revocation, RevocationMode::Strict);
    }

    #[test]
    fn test_policy_partial_uses_defaults() {
        let policy: RegistryPolicy = serde_json::from_str(r#"{"revocation":"strict"}"#).unwrap();
        assert_eq!(policy.disclosure, DisclosurePolicy::Full);
        assert_eq!(policy.revocation, RevocationMode::Strict);
    }
}
