//! Credential store: one-way salted password hashing and verification.
//!
//! Hashing is deliberately slow, so async callers should use
//! [`CredentialStore::hash_blocking`] and [`CredentialStore::verify_blocking`],
//! which move the work onto the blocking pool.

use std::fmt;

use super::{Password, spawn_blocking_traced};

/// Work factor used in production.
pub const DEFAULT_HASH_COST: u32 = 12;
/// Smallest work factor accepted by the hash algorithm.
pub const MIN_HASH_COST: u32 = 4;
/// Largest work factor accepted by the hash algorithm.
pub const MAX_HASH_COST: u32 = 31;

/// Failures while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The configured work factor is outside the supported range.
    #[error("hash cost {cost} outside {MIN_HASH_COST}..={MAX_HASH_COST}")]
    InvalidCost {
        /// Rejected work factor.
        cost: u32,
    },
    /// The hashing backend failed.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Backend diagnostic.
        message: String,
    },
}

/// Stored one-way password hash in modular crypt format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash loaded from storage.
    pub fn from_stored(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash suitable for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Hashes and verifies passwords with a fixed work factor.
///
/// # Examples
/// ```
/// use forum_backend::domain::{CredentialStore, Password};
///
/// let store = CredentialStore::new(4).expect("valid cost");
/// let password = Password::for_signup("correct horse").expect("valid password");
/// let hash = store.hash(&password).expect("hash");
/// assert!(store.verify(&password, &hash));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialStore {
    cost: u32,
}

impl CredentialStore {
    /// Build a store with the given work factor.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidCost`] outside
    /// [`MIN_HASH_COST`]..=[`MAX_HASH_COST`].
    pub const fn new(cost: u32) -> Result<Self, CredentialError> {
        if cost < MIN_HASH_COST || cost > MAX_HASH_COST {
            return Err(CredentialError::InvalidCost { cost });
        }
        Ok(Self { cost })
    }

    /// Configured work factor.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// [`Password`] already rejects inputs the algorithm would truncate.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] if the backend fails.
    pub fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialError> {
        bcrypt::hash(password.expose(), self.cost)
            .map(PasswordHash)
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })
    }

    /// Check a password against a stored hash.
    ///
    /// A malformed hash counts as a mismatch.
    #[must_use]
    pub fn verify(&self, password: &Password, hash: &PasswordHash) -> bool {
        bcrypt::verify(password.expose(), hash.as_str()).unwrap_or(false)
    }

    /// [`Self::hash`] on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] if the backend fails or the
    /// blocking task is lost.
    pub async fn hash_blocking(&self, password: Password) -> Result<PasswordHash, CredentialError> {
        let store = *self;
        spawn_blocking_traced(move || store.hash(&password))
            .await
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })?
    }

    /// [`Self::verify`] on the blocking pool; a lost task counts as a mismatch.
    pub async fn verify_blocking(&self, password: Password, hash: PasswordHash) -> bool {
        let store = *self;
        spawn_blocking_traced(move || store.verify(&password, &hash))
            .await
            .unwrap_or(false)
    }

    /// Spend the work of one verification at this store's cost, then report
    /// a mismatch.
    ///
    /// Used when no account matches, so an unknown identifier costs as much
    /// as a wrong password.
    pub async fn reject_blocking(&self, password: Password) -> bool {
        let store = *self;
        spawn_blocking_traced(move || {
            drop(store.hash(&password));
            false
        })
        .await
        .unwrap_or(false)
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self {
            cost: DEFAULT_HASH_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> CredentialStore {
        CredentialStore::new(MIN_HASH_COST).expect("minimum cost is valid")
    }

    fn password(raw: &str) -> Password {
        Password::for_signup(raw).expect("fixture password")
    }

    #[rstest]
    fn verifies_the_original_password(store: CredentialStore) {
        let secret = password("correct horse");
        let hash = store.hash(&secret).expect("hash");
        assert!(store.verify(&secret, &hash));
    }

    #[rstest]
    fn rejects_a_different_password(store: CredentialStore) {
        let hash = store.hash(&password("correct horse")).expect("hash");
        assert!(!store.verify(&password("battery staple"), &hash));
    }

    #[rstest]
    fn hashes_are_salted(store: CredentialStore) {
        let secret = password("correct horse");
        let first = store.hash(&secret).expect("hash");
        let second = store.hash(&secret).expect("hash");
        assert_ne!(first, second);
        assert_ne!(first.as_str(), secret.expose());
    }

    #[rstest]
    fn malformed_hash_is_a_mismatch(store: CredentialStore) {
        let hash = PasswordHash::from_stored("not a bcrypt hash");
        assert!(!store.verify(&password("correct horse"), &hash));
    }

    #[rstest]
    #[case(MIN_HASH_COST - 1)]
    #[case(MAX_HASH_COST + 1)]
    fn rejects_out_of_range_costs(#[case] cost: u32) {
        assert_eq!(
            CredentialStore::new(cost),
            Err(CredentialError::InvalidCost { cost })
        );
    }

    #[rstest]
    fn default_uses_production_cost() {
        assert_eq!(CredentialStore::default().cost(), DEFAULT_HASH_COST);
    }

    #[rstest]
    #[tokio::test]
    async fn blocking_variants_agree(store: CredentialStore) {
        let hash = store
            .hash_blocking(password("correct horse"))
            .await
            .expect("hash");
        assert!(store.verify_blocking(password("correct horse"), hash.clone()).await);
        assert!(!store.verify_blocking(password("wrong horse"), hash).await);
    }

    #[rstest]
    #[tokio::test]
    async fn rejection_never_matches(store: CredentialStore) {
        assert!(!store.reject_blocking(password("correct horse")).await);
    }
}
