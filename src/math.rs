//! Shared modular-arithmetic helpers.
//!
//! These build on the same `num-bigint-dig` traits the original accumulator
//! implementation uses (`ExtendedGcd`, `ModInverse`) rather than hand-rolling
//! big-integer arithmetic.

use num_bigint::traits::{ExtendedGcd, ModInverse};
use num_bigint::{BigInt, BigUint, IntoBigUint};
use num_traits::Signed;

use crate::error::AccumulatorError;

/// `base^exponent mod modulus`, where `exponent` may be negative: a negative
/// exponent is resolved by inverting `base` mod `modulus` first.
///
/// Mirrors the reference implementation's use of Bezout coefficients (which
/// are signed) as exponents in modular exponentiation.
pub fn modpow_uint_int(
    base: &BigUint,
    exponent: &BigInt,
    modulus: &BigUint,
) -> Result<BigUint, AccumulatorError> {
    if exponent.is_negative() {
        let inv = mod_inverse(base, modulus)?;
        let positive_exponent = (-exponent)
            .to_biguint()
            .expect("negated negative BigInt is non-negative");
        Ok(inv.modpow(&positive_exponent, modulus))
    } else {
        let positive_exponent = exponent
            .to_biguint()
            .expect("non-negative BigInt converts to BigUint");
        Ok(base.modpow(&positive_exponent, modulus))
    }
}

/// `value^-1 mod modulus`. Fails with `InternalInvariant` if `value` is not
/// invertible mod `modulus` (the construction guarantees invertibility for
/// every prime this crate ever uses as an exponent).
pub fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Result<BigUint, AccumulatorError> {
    value
        .clone()
        .mod_inverse(modulus)
        .and_then(|inv| inv.into_biguint())
        .ok_or_else(|| {
            AccumulatorError::InternalInvariant(format!(
                "{} has no inverse mod {}",
                value, modulus
            ))
        })
}

/// Bezout coefficients `(gcd, a, b)` such that `a*lhs + b*rhs == gcd`.
pub fn extended_gcd(lhs: &BigUint, rhs: &BigUint) -> (BigInt, BigInt, BigInt) {
    ExtendedGcd::extended_gcd(lhs, rhs)
}

/// Bit-length of a `BigUint`, counting `0` as zero bits.
pub fn bit_length(value: &BigUint) -> usize {
    value.bits() as usize
}
