//! `PrimeGen`: safe random prime search via a mod-30 wheel sieve, and
//! assembly of an RSA modulus from an independently generated prime pair.

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, Rng};

use crate::config::{MAX_PAIR_ASSEMBLY_RETRIES, PRIME_GEN_ROUNDS};
use crate::error::AccumulatorError;
use crate::math::bit_length;
use crate::primality::{is_prime_random, random_round};

/// The gaps between successive residues coprime to 30, starting from 1:
/// 1, 7, 11, 13, 17, 19, 23, 29, (31 = 1 + 30), ...
const WHEEL_DELTAS: [u32; 8] = [6, 4, 2, 4, 2, 4, 6, 2];

/// An ordered pair of distinct odd primes, `p >= q`, whose product has a
/// known target bit-length.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Primes {
    /// The larger prime.
    pub p: BigUint,
    /// The smaller prime.
    pub q: BigUint,
}

impl Primes {
    /// `n = p * q`.
    pub fn modulus(&self) -> BigUint {
        &self.p * &self.q
    }

    /// Euler's totient `(p-1)(q-1)`, the private exponent modulus.
    pub fn totient(&self) -> BigUint {
        (&self.p - BigUint::one()) * (&self.q - BigUint::one())
    }
}

/// Align `candidate` upward to the least value `>= candidate` congruent to
/// 1 mod 30 (the reference point the wheel cycle starts its deltas from;
/// the design document calls this point "31 mod 30" because the search
/// always begins from an odd starting offset of at least 1 above a
/// multiple of 30).
fn align_to_wheel_start(candidate: &BigUint) -> BigUint {
    let thirty = BigUint::from(30u32);
    let one = BigUint::one();
    let remainder = candidate % &thirty;
    if remainder <= one {
        candidate + (&one - &remainder)
    } else {
        candidate + (&thirty + &one - &remainder)
    }
}

/// Search for a random odd prime of exactly `bits` bits using the mod-30
/// wheel sieve described in the design.
pub fn generate_prime<R: Rng + CryptoRng>(
    rng: &mut R,
    bits: usize,
    cancel: Option<&AtomicBool>,
) -> Result<BigUint, AccumulatorError> {
    let low = BigUint::one() << (bits - 1);
    let high = BigUint::one() << bits;

    'outer: loop {
        if let Some(flag) = cancel {
            if !flag.load(Ordering::Relaxed) {
                return Err(AccumulatorError::InternalInvariant(
                    "prime search cancelled".to_string(),
                ));
            }
        }

        let sample = rng.gen_biguint_range(&low, &high);
        let mut candidate = align_to_wheel_start(&sample);
        let mut delta_index = 0usize;

        loop {
            if bit_length(&candidate) > bits {
                continue 'outer;
            }

            if let Some(flag) = cancel {
                if !flag.load(Ordering::Relaxed) {
                    return Err(AccumulatorError::InternalInvariant(
                        "prime search cancelled".to_string(),
                    ));
                }
            }

            if random_round(&candidate, rng, cancel)? {
                if is_prime_random(&candidate, rng, PRIME_GEN_ROUNDS, cancel)? {
                    log::trace!("prime_gen: found {}-bit candidate", bits);
                    return Ok(candidate);
                }
                log::trace!("prime_gen: candidate passed quick round but failed full test");
            }

            candidate += BigUint::from(WHEEL_DELTAS[delta_index]);
            delta_index = (delta_index + 1) % WHEEL_DELTAS.len();
        }
    }
}

/// Generate a `Primes` pair whose product has exactly `modulus_bits` bits:
/// `p` with `ceil(modulus_bits / 2)` bits, `q` with `floor(modulus_bits / 2)`
/// bits, canonically ordered `p >= q`.
pub fn generate_primes<R: Rng + CryptoRng>(
    rng: &mut R,
    modulus_bits: usize,
    cancel: Option<&AtomicBool>,
) -> Result<Primes, AccumulatorError> {
    let p_bits = (modulus_bits + 1) / 2;
    let q_bits = modulus_bits / 2;

    for attempt in 0..MAX_PAIR_ASSEMBLY_RETRIES {
        let mut p = generate_prime(rng, p_bits, cancel)?;
        let mut q = generate_prime(rng, q_bits, cancel)?;
        if p < q {
            std::mem::swap(&mut p, &mut q);
        }

        let n = &p * &q;
        if bit_length(&n) == modulus_bits {
            return Ok(Primes { p, q });
        }

        log::debug!(
            "prime_gen: pair assembly retry {} produced {}-bit modulus, wanted {}",
            attempt,
            bit_length(&n),
            modulus_bits
        );
    }

    Err(AccumulatorError::InternalInvariant(format!(
        "failed to assemble a {}-bit modulus after {} retries",
        modulus_bits, MAX_PAIR_ASSEMBLY_RETRIES
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn generate_prime_has_exact_bit_length() {
        let mut rng = ChaChaRng::from_seed([1u8; 32]);
        for _ in 0..5 {
            let p = generate_prime(&mut rng, 64, None).unwrap();
            assert_eq!(bit_length(&p), 64);
            assert!(crate::primality::is_prime_random(&p, &mut rng, 24, None).unwrap());
        }
    }

    #[test]
    fn generate_primes_hits_target_modulus_bits() {
        let mut rng = ChaChaRng::from_seed([2u8; 32]);
        let primes = generate_primes(&mut rng, 128, None).unwrap();
        assert_eq!(bit_length(&primes.modulus()), 128);
        assert!(primes.p >= primes.q);
    }
}
