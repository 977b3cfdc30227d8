//! Fixed credential list, loaded once at startup and immutable thereafter.

/// A single identity/secret pair.
#[derive(Debug, Clone)]
pub struct Credential {
    pub identity: String,
    pub secret: String,
}

/// The full credential set, queried for exact matches only.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    entries: Vec<Credential>,
}

impl CredentialSet {
    pub fn new(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// True when some entry matches both identity and secret exactly.
    /// Callers must not distinguish "unknown identity" from "wrong secret".
    pub fn matches(&self, identity: &str, secret: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.identity == identity && entry.secret == secret)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
