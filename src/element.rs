//! `Element` (the owned byte value a witness is issued for) and the
//! `ElementMap` algorithm that deterministically maps `(digest, Element)` to
//! a prime representative and the nonce that recovers it.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::config::ELEMENT_MAP_ROUNDS;
use crate::digest::DigestHandle;
use crate::error::AccumulatorError;
use crate::primality::is_prime_fixed;

/// An owned element value. Wraps raw bytes so the exact encoding (the
/// "exact encoding is part of the witness's meaning" requirement) is fixed
/// once an `Element` is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Element(Vec<u8>);

impl Element {
    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Element {
    fn from(bytes: Vec<u8>) -> Self {
        Element(bytes)
    }
}

impl From<&[u8]> for Element {
    fn from(bytes: &[u8]) -> Self {
        Element(bytes.to_vec())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element(s.into_bytes())
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element(s.as_bytes().to_vec())
    }
}

/// `ElementMap(H, x) -> (y, nonce)`.
///
/// `y` is the least prime `>= (H(x) mod 2^prime_bits)` found by the
/// parity-aware stepping rule (step by 2 from `d1`, or from `d1 + 1` if
/// `d1` is even), reduced modulo `2^prime_bits`. `nonce = y - d1`.
///
/// Deterministic in `(digest, x)`: the primality test uses a fixed witness
/// sequence, not an RNG.
pub fn map_to_prime(
    digest: &DigestHandle,
    x: &Element,
    prime_bits: usize,
) -> Result<(BigUint, BigUint), AccumulatorError> {
    let h = digest.digest(x.as_bytes());
    let d0 = BigUint::from_bytes_be(&h);

    let modulus = BigUint::from(1u32) << prime_bits;
    let d1 = &d0 % &modulus;

    let mut candidate = if (&d1 % 2u32).is_zero() {
        &d1 + BigUint::from(1u32)
    } else {
        d1.clone()
    };

    loop {
        if is_prime_fixed(&candidate, ELEMENT_MAP_ROUNDS) {
            break;
        }
        candidate += BigUint::from(2u32);
    }

    let y = &candidate % &modulus;
    if y < d1 {
        // The search only ever increases the candidate from d1, so y
        // wrapping below d1 after reduction mod 2^prime_bits means the
        // search ran past the top of the range entirely.
        return Err(AccumulatorError::InternalInvariant(
            "element prime search wrapped around 2^prime_bits".to_string(),
        ));
    }

    let nonce = &y - &d1;

    Ok((y, nonce))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestId;

    #[test]
    fn map_to_prime_is_deterministic() {
        let digest = DigestId::Sha256.resolve();
        let x: Element = "hello".into();
        let (y1, n1) = map_to_prime(&digest, &x, 128).unwrap();
        let (y2, n2) = map_to_prime(&digest, &x, 128).unwrap();
        assert_eq!(y1, y2);
        assert_eq!(n1, n2);
    }

    #[test]
    fn map_to_prime_differs_across_elements() {
        let digest = DigestId::Sha256.resolve();
        let a: Element = "a".into();
        let b: Element = "b".into();
        let (ya, _) = map_to_prime(&digest, &a, 128).unwrap();
        let (yb, _) = map_to_prime(&digest, &b, 128).unwrap();
        assert_ne!(ya, yb);
    }

    #[test]
    fn map_to_prime_nonce_recovers_y() {
        let digest = DigestId::Sha256.resolve();
        let x: Element = "recompute-me".into();
        let h = digest.digest(x.as_bytes());
        let d0 = BigUint::from_bytes_be(&h);
        let modulus = BigUint::from(1u32) << 128usize;
        let d1 = &d0 % &modulus;

        let (y, nonce) = map_to_prime(&digest, &x, 128).unwrap();
        assert_eq!(y, &d1 + &nonce);
        assert!(crate::primality::is_prime_fixed(&y, 24));
    }
}
