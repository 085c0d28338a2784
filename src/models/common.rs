use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Opaque API key shared read-only by every call of a round.
pub struct Credential(SecretString);

impl Credential {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(SecretString::from(api_key.into()))
    }

    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_the_key() {
        let credential = Credential::new("AIza-secret");
        assert!(!format!("{:?}", credential).contains("AIza"));
    }

    #[test]
    fn whitespace_key_is_blank() {
        assert!(Credential::new("  ").is_blank());
        assert!(!Credential::new("k").is_blank());
    }
}
