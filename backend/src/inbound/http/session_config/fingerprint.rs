//! Loggable identity of the signing key.

use sha2::{Digest, Sha256};

use crate::domain::SessionSecret;

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of the key's SHA-256 digest, as lowercase hex.
///
/// Two instances signing with the same key log the same fingerprint, which
/// is how operators check that sessions survive a rolling restart.
///
/// ```rust
/// use forum_backend::domain::SessionSecret;
/// use forum_backend::inbound::http::session_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(&SessionSecret::new(vec![7; 32]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SessionSecret) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    let prefix: Vec<u8> = digest.iter().copied().take(FINGERPRINT_BYTES).collect();
    hex::encode(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_key_same_fingerprint() {
        let a = secret_fingerprint(&SessionSecret::new(vec![b'k'; 32]));
        let b = secret_fingerprint(&SessionSecret::new(vec![b'k'; 32]));
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    #[case(vec![b'k'; 32], vec![b'k'; 33])]
    #[case(vec![0; 64], vec![1; 64])]
    fn different_keys_differ(#[case] left: Vec<u8>, #[case] right: Vec<u8>) {
        assert_ne!(
            secret_fingerprint(&SessionSecret::new(left)),
            secret_fingerprint(&SessionSecret::new(right))
        );
    }
}
