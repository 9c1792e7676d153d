//! Content-addressed identifiers
//!
//! Questions and their answers are identified by the SHA-256 digest of their
//! literal text. Identifiers combine with XOR, which makes a question's
//! identifier independent of the order its answers were listed in.

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::BitXor;

/// A 256-bit identifier derived from text (Value Object)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; ContentId::LEN]);

impl ContentId {
    /// Digest length in bytes
    pub const LEN: usize = 32;

    /// Digest of the given text
    pub fn of(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, DomainError> {
        let decoded =
            hex::decode(hex_str).map_err(|e| DomainError::InvalidIdentifier(e.to_string()))?;
        let bytes: [u8; Self::LEN] = decoded.try_into().map_err(|v: Vec<u8>| {
            DomainError::InvalidIdentifier(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First eight hex digits, for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl BitXor for ContentId {
    type Output = ContentId;

    fn bitxor(self, rhs: ContentId) -> ContentId {
        let mut bytes = self.0;
        for (b, r) in bytes.iter_mut().zip(rhs.0.iter()) {
            *b ^= r;
        }
        ContentId(bytes)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short())
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
