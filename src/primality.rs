//! Miller-Rabin primality testing, in two flavors:
//!
//! - random-witness, used by `prime_gen` for modulus primes (where
//!   determinism across calls does not matter and stronger randomized
//!   assurance is preferred);
//! - fixed-witness, used by `element` for element prime representatives
//!   (where `ElementMap` must be a pure function of its input, so the
//!   witnesses it tests against cannot depend on an RNG).

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use crate::error::AccumulatorError;

/// Check a cooperative cancellation flag, per spec.md §5's "honoured at
/// prime-search iteration boundaries and at each Miller-Rabin round."
fn check_cancel(cancel: Option<&AtomicBool>) -> Result<(), AccumulatorError> {
    if let Some(flag) = cancel {
        if !flag.load(Ordering::Relaxed) {
            return Err(AccumulatorError::InternalInvariant(
                "prime search cancelled".to_string(),
            ));
        }
    }
    Ok(())
}

/// The first 25 primes, used as the fixed witness sequence for deterministic
/// testing of the (at most 128-bit) candidates `ElementMap` produces.
pub const FIRST_PRIMES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Write `n - 1 = 2^s * d` with `d` odd.
fn decompose(n_minus_one: &BigUint) -> (u64, BigUint) {
    let mut s = 0u64;
    let mut d = n_minus_one.clone();
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }
    (s, d)
}

/// One Miller-Rabin round against witness `a`. Returns `true` if `n` passes
/// (is probably prime with respect to this witness), `false` if `a` proves
/// `n` composite.
fn round(n: &BigUint, n_minus_one: &BigUint, s: u64, d: &BigUint, a: &BigUint) -> bool {
    let mut x = a.modpow(d, n);
    if x.is_one() || &x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = x.modpow(&BigUint::from(2u32), n);
        if &x == n_minus_one {
            return true;
        }
    }
    false
}

fn trivial_cases(n: &BigUint) -> Option<bool> {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);
    if n < &two {
        return Some(false);
    }
    if n == &two || n == &three {
        return Some(true);
    }
    if n.is_even() {
        return Some(false);
    }
    None
}

/// Run a single random-witness Miller-Rabin round. Used by `prime_gen` as
/// the cheap early-rejection filter before committing to the full round
/// count.
///
/// `cancel` is checked once before the round runs — a single round is cheap
/// enough that checking at its boundary is sufficient to bound the cost of
/// an honoured cancellation to one round.
pub fn random_round<R: Rng>(
    n: &BigUint,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<bool, AccumulatorError> {
    check_cancel(cancel)?;
    if let Some(result) = trivial_cases(n) {
        return Ok(result);
    }
    let n_minus_one = n - BigUint::one();
    let (s, d) = decompose(&n_minus_one);
    let low = BigUint::from(2u32);
    let high = n - BigUint::from(2u32);
    let a = rng.gen_biguint_range(&low, &high);
    Ok(round(n, &n_minus_one, s, &d, &a))
}

/// Run `rounds` random-witness Miller-Rabin rounds, honouring `cancel` at
/// each round boundary — the dominant cost of a modulus-size candidate's
/// primality test, and where spec.md §5 requires cancellation to be checked.
pub fn is_prime_random<R: Rng>(
    n: &BigUint,
    rng: &mut R,
    rounds: usize,
    cancel: Option<&AtomicBool>,
) -> Result<bool, AccumulatorError> {
    if let Some(result) = trivial_cases(n) {
        return Ok(result);
    }
    let n_minus_one = n - BigUint::one();
    let (s, d) = decompose(&n_minus_one);
    let low = BigUint::from(2u32);
    let high = n - BigUint::from(2u32);
    for _ in 0..rounds {
        check_cancel(cancel)?;
        let a = rng.gen_biguint_range(&low, &high);
        if !round(n, &n_minus_one, s, &d, &a) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Run up to `rounds` fixed-witness Miller-Rabin rounds using the first
/// `rounds` primes as witnesses (capped at `FIRST_PRIMES.len()`). Pure
/// function of `n`: no RNG involved, so two calls with the same `n` always
/// agree.
pub fn is_prime_fixed(n: &BigUint, rounds: usize) -> bool {
    if let Some(result) = trivial_cases(n) {
        return result;
    }
    let n_minus_one = n - BigUint::one();
    let (s, d) = decompose(&n_minus_one);
    let rounds = rounds.min(FIRST_PRIMES.len());
    for &base in &FIRST_PRIMES[..rounds] {
        let a = BigUint::from(base);
        if a >= *n {
            // n itself is one of the small fixed witnesses; already handled
            // by trivial_cases for primes, and composite multiples of a
            // small prime are caught by earlier witnesses.
            continue;
        }
        if !round(n, &n_minus_one, s, &d, &a) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn fixed_agrees_on_known_primes() {
        for &p in &[101u64, 7919, 104729] {
            assert!(is_prime_fixed(&BigUint::from(p), 24));
        }
    }

    #[test]
    fn fixed_agrees_on_known_composites() {
        for &c in &[100u64, 7920, 104730, 9999] {
            assert!(!is_prime_fixed(&BigUint::from(c), 24));
        }
    }

    #[test]
    fn fixed_is_deterministic() {
        let n = BigUint::from(104729u64);
        assert_eq!(is_prime_fixed(&n, 24), is_prime_fixed(&n, 24));
    }

    #[test]
    fn random_agrees_on_known_values() {
        let mut rng = ChaChaRng::from_seed([7u8; 32]);
        assert!(is_prime_random(&BigUint::from(104729u64), &mut rng, 24, None).unwrap());
        assert!(!is_prime_random(&BigUint::from(104730u64), &mut rng, 24, None).unwrap());
    }

    #[test]
    fn random_honours_cancellation() {
        let mut rng = ChaChaRng::from_seed([8u8; 32]);
        let cancelled = AtomicBool::new(false);
        assert!(matches!(
            is_prime_random(&BigUint::from(104729u64), &mut rng, 24, Some(&cancelled)).unwrap_err(),
            AccumulatorError::InternalInvariant(_)
        ));
        assert!(matches!(
            random_round(&BigUint::from(104729u64), &mut rng, Some(&cancelled)).unwrap_err(),
            AccumulatorError::InternalInvariant(_)
        ));
    }
}
