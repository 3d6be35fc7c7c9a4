//! Recomputing an element's prime representative from a carried nonce,
//! without re-running the prime search. This is the operation verifiers use
//! (`y = H(x) + nonce`, spec §4.3): cheap, deterministic, no primality
//! testing required.

use num_bigint::BigUint;

use crate::digest::DigestHandle;
use crate::element::Element;

/// `d1 = H(x) mod 2^prime_bits`, the low-order bits of the digest that
/// `ElementMap` searched forward from.
pub fn digest_residue(digest: &DigestHandle, x: &Element, prime_bits: usize) -> BigUint {
    let h = digest.digest(x.as_bytes());
    let d0 = BigUint::from_bytes_be(&h);
    let modulus = BigUint::from(1u32) << prime_bits;
    d0 % modulus
}

/// Recover `y = H(x) + nonce`, the element's prime representative, from a
/// previously issued `nonce` — no prime search needed.
pub fn prime_from_nonce(
    digest: &DigestHandle,
    x: &Element,
    nonce: &BigUint,
    prime_bits: usize,
) -> BigUint {
    digest_residue(digest, x, prime_bits) + nonce
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestId;
    use crate::element::map_to_prime;

    #[test]
    fn prime_from_nonce_matches_map_to_prime() {
        let digest = DigestId::Sha256.resolve();
        let x: Element = "round-trip".into();
        let (y, nonce) = map_to_prime(&digest, &x, 128).unwrap();
        assert_eq!(prime_from_nonce(&digest, &x, &nonce, 128), y);
    }
}
