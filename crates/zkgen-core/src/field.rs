use crate::{CoreError, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// Big-endian bytes of the BN254 scalar field modulus.
const BN254_PRIME_BE: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

pub const BN254_MASK_BITS: u32 = 253;

/// Field modulus `P` and bit mask `MASK` handed to the runtime alongside the compiled circuit.
///
/// Generated code only refers to these symbolically; the values are carried into the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(with = "crate::decimal")]
    pub prime: BigUint,
    #[serde(with = "crate::decimal")]
    pub mask: BigUint,
}

impl FieldConfig {
    pub fn new(prime: BigUint, mask: BigUint) -> Result<Self> {
        if prime <= BigUint::one() {
            return Err(CoreError::InvalidField(format!(
                "prime must be greater than 1, got {prime}"
            )));
        }
        if mask.is_zero() {
            return Err(CoreError::InvalidField("mask must be non-zero".into()));
        }
        Ok(Self { prime, mask })
    }

    /// `MASK = 2^bits - 1`.
    pub fn with_mask_bits(prime: BigUint, bits: u32) -> Result<Self> {
        if bits == 0 {
            return Err(CoreError::InvalidField("mask width must be at least 1 bit".into()));
        }
        let mask = (BigUint::one() << bits) - BigUint::one();
        Self::new(prime, mask)
    }

    pub fn bn254() -> Self {
        Self {
            prime: BigUint::from_bytes_be(&BN254_PRIME_BE),
            mask: (BigUint::one() << BN254_MASK_BITS) - BigUint::one(),
        }
    }

    pub fn mask_bits(&self) -> u64 {
        self.mask.bits()
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::bn254()
    }
}
