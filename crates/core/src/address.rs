//! Fixed-size address and hash types.

use crate::{Error, Result, ADDRESS_SIZE, HASH_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte account address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Address([u8; ADDRESS_SIZE]);

/// A 20-byte validator operator address.
///
/// Validator operators and plain accounts share the same underlying key
/// material; the distinct type keeps the two address spaces from being mixed
/// up in signatures and store keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ValAddress([u8; ADDRESS_SIZE]);

/// A 32-byte hash, used for block hashes and seed material.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Hash([u8; HASH_SIZE]);

macro_rules! impl_fixed_bytes {
    ($name:ident, $size:expr) => {
        impl $name {
            /// The all-zero value.
            pub fn zero() -> Self {
                Self([0u8; $size])
            }

            /// Creates the value from a byte slice of exactly the right length.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                if bytes.len() != $size {
                    return Err(Error::InvalidLength {
                        expected: $size,
                        got: bytes.len(),
                    });
                }
                let mut buf = [0u8; $size];
                buf.copy_from_slice(bytes);
                Ok(Self(buf))
            }

            /// Returns the underlying bytes.
            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// Whether this is the all-zero value.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|&b| b == 0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }
    };
}

impl_fixed_bytes!(Address, ADDRESS_SIZE);
impl_fixed_bytes!(ValAddress, ADDRESS_SIZE);
impl_fixed_bytes!(Hash, HASH_SIZE);

impl ValAddress {
    /// The account address controlled by this validator's operator key.
    pub fn account(&self) -> Address {
        Address(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_roundtrip() {
        let addr = Address::from_bytes(&[7u8; 20]).unwrap();
        assert_eq!(addr.as_bytes(), &[7u8; 20]);
        assert!(!addr.is_zero());
        assert!(Address::zero().is_zero());
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = Address::from_bytes(&[1u8; 19]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLength {
                expected: 20,
                got: 19
            }
        ));
        assert!(Hash::from_bytes(&[1u8; 20]).is_err());
    }

    #[test]
    fn test_display_is_hex() {
        let addr = Address::from([0xab; 20]);
        assert_eq!(addr.to_string(), "ab".repeat(20));
    }

    #[test]
    fn test_validator_account_shares_bytes() {
        let val = ValAddress::from([3u8; 20]);
        assert_eq!(val.account().as_bytes(), val.as_bytes());
    }
}
