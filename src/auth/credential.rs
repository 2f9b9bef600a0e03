use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bearer credential for the upstream data API.
///
/// Replaced wholesale on every refresh; never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    /// UNIX timestamp (seconds) at which the token was issued.
    pub issued_at: i64,
}

impl Credential {
    pub fn new(token: String, issued_at: i64) -> Self {
        Self { token, issued_at }
    }

    /// Valid iff the token is non-empty and younger than the TTL.
    pub fn is_valid(&self, ttl: Duration, now: i64) -> bool {
        !self.token.is_empty() && now - self.issued_at < ttl.as_secs() as i64
    }

    pub fn expires_at(&self, ttl: Duration) -> i64 {
        self.issued_at + ttl.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_window_is_issued_at_plus_ttl() {
        let ttl = Duration::from_secs(3600);
        let credential = Credential::new("tok".into(), 1_000);

        assert!(credential.is_valid(ttl, 1_000));
        assert!(credential.is_valid(ttl, 4_599));
        assert!(!credential.is_valid(ttl, 4_600));
        assert_eq!(credential.expires_at(ttl), 4_600);
    }

    #[test]
    fn empty_token_is_never_valid() {
        let credential = Credential::new(String::new(), 1_000);
        assert!(!credential.is_valid(Duration::from_secs(3600), 1_000));
    }
}
