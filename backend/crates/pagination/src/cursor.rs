//! URL-safe opaque cursor codec.
//!
//! A cursor is the JSON form of a sort key, base64 encoded with the URL-safe
//! alphabet and no padding so it can travel in a query string untouched.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised while encoding or decoding a cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The cursor text is not URL-safe base64.
    #[error("cursor is not valid base64: {message}")]
    Encoding {
        /// Decoder diagnostic.
        message: String,
    },
    /// The decoded bytes do not describe a sort key.
    #[error("cursor payload is malformed: {message}")]
    Payload {
        /// Serializer diagnostic.
        message: String,
    },
}

/// Continuation token wrapping the sort key of the last item a client saw.
///
/// # Examples
///
/// ```
/// use pagination::Cursor;
///
/// let cursor = Cursor::new((1_700_000_000_i64, 42_u32));
/// let encoded = cursor.encode().expect("encode");
/// let decoded = Cursor::<(i64, u32)>::decode(&encoded).expect("decode");
/// assert_eq!(decoded, cursor);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a sort key.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the wrapped sort key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Unwrap the sort key.
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Render the cursor as opaque URL-safe text.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Payload`] when the key cannot be serialized.
    pub fn encode(&self) -> Result<String, CursorError> {
        let bytes = serde_json::to_vec(&self.key).map_err(|err| CursorError::Payload {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Parse opaque cursor text produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Encoding`] for text outside the base64 alphabet
    /// and [`CursorError::Payload`] when the bytes are not a sort key.
    pub fn decode(raw: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.trim())
            .map_err(|err| CursorError::Encoding {
                message: err.to_string(),
            })?;
        let key = serde_json::from_slice(&bytes).map_err(|err| CursorError::Payload {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}
