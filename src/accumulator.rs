//! The accumulator itself: holder (trusted) and public-verifier
//! operation over `(n, optional d, z)`.

use std::sync::atomic::AtomicBool;

use num_bigint::BigUint;

use crate::config::{AccumulatorConfig, BASE};
use crate::digest::DigestHandle;
use crate::element::{map_to_prime, Element};
use crate::element_prime::prime_from_nonce;
use crate::error::AccumulatorError;
use crate::math::mod_inverse;
use crate::prime_gen::{self, Primes};
use crate::witness::Witness;

/// A constant-size commitment to a dynamic multiset of elements.
///
/// Holds the private exponent `d` (Euler's totient of the modulus) only when
/// constructed by the holder; a public-verifier `Accumulator` holds only
/// `n` and the current `z`, and rejects `add`/`del`/`prove` with
/// `SecretRequired`.
#[derive(Debug, Clone)]
pub struct Accumulator {
    digest: DigestHandle,
    config: AccumulatorConfig,
    n: BigUint,
    d: Option<BigUint>,
    z: BigUint,
}

impl Accumulator {
    /// Run `PrimeGen` to mint a fresh modulus and return a holder
    /// accumulator for it, along with the `Primes` the caller may want to
    /// retain (e.g. to persist alongside the accumulator so it can be
    /// reloaded as a holder rather than a public verifier).
    pub fn setup<R: rand::Rng + rand::CryptoRng>(
        rng: &mut R,
        digest: DigestHandle,
        config: AccumulatorConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<(Self, Primes), AccumulatorError> {
        let primes = prime_gen::generate_primes(rng, config.modulus_bits, cancel)?;
        let acc = Self::from_primes(digest, config, primes.clone());
        Ok((acc, primes))
    }

    /// Build a holder accumulator from an already-generated `Primes` pair,
    /// with `z` at its initial value `BASE`.
    pub fn from_primes(digest: DigestHandle, config: AccumulatorConfig, primes: Primes) -> Self {
        let n = primes.modulus();
        let d = primes.totient();
        Accumulator {
            digest,
            config,
            n,
            d: Some(d),
            z: BigUint::from(BASE),
        }
    }

    /// Rebuild a holder accumulator at a specific `z` (e.g. after reloading
    /// persisted state per spec §6's persistence layout).
    pub fn from_primes_with_state(
        digest: DigestHandle,
        config: AccumulatorConfig,
        primes: Primes,
        z: BigUint,
    ) -> Self {
        let n = primes.modulus();
        let d = primes.totient();
        Accumulator {
            digest,
            config,
            n,
            d: Some(d),
            z,
        }
    }

    /// Build a public-verifier accumulator from only `(n, z)`. Such an
    /// accumulator can verify witnesses and apply `Update`s, but not
    /// add, delete, or prove.
    pub fn from_public(digest: DigestHandle, config: AccumulatorConfig, n: BigUint, z: BigUint) -> Self {
        Accumulator {
            digest,
            config,
            n,
            d: None,
            z,
        }
    }

    /// The RSA modulus.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// The current accumulation value.
    pub fn z(&self) -> &BigUint {
        &self.z
    }

    /// Whether this accumulator holds the private exponent.
    pub fn is_holder(&self) -> bool {
        self.d.is_some()
    }

    /// `(n, z)` at this moment — used to open an `Update`.
    pub fn snapshot(&self) -> (BigUint, BigUint) {
        (self.n.clone(), self.z.clone())
    }

    /// A cheap clone of this accumulator's digest handle, for constructing
    /// `Witness`/`Update` values that need to recompute element primes.
    pub fn digest(&self) -> DigestHandle {
        self.digest.clone()
    }

    /// The configured element-prime bit width.
    pub fn prime_bits(&self) -> usize {
        self.config.prime_bits
    }

    /// Absorb `x`, returning a pre-image witness for it.
    ///
    /// Forbidden on a public-verifier accumulator: without `d` there is no
    /// way for the holder's peers to learn the new `z` is consistent, and
    /// (per the design's resolved open question) this crate simply rejects
    /// the call rather than mutate `z` inconsistently.
    pub fn add<E: Into<Element>>(&mut self, x: E) -> Result<Witness, AccumulatorError> {
        if self.d.is_none() {
            return Err(AccumulatorError::SecretRequired);
        }
        let x = x.into();
        let (y, nonce) = map_to_prime(&self.digest, &x, self.config.prime_bits)?;
        let w = self.z.clone();
        self.z = self.z.modpow(&y, &self.n);
        log::trace!("accumulator: added element, z updated");
        Ok(Witness::new(x, nonce, w))
    }

    /// Remove the element `witness` attests to. Validates the witness
    /// first; `z` is only mutated after validation succeeds.
    pub fn del(&mut self, witness: &Witness) -> Result<(), AccumulatorError> {
        if !self.verify(witness) {
            return Err(AccumulatorError::WitnessInvalid);
        }
        let d = self
            .d
            .as_ref()
            .ok_or(AccumulatorError::SecretRequired)?
            .clone();
        let y = prime_from_nonce(&self.digest, &witness.x, &witness.nonce, self.config.prime_bits);
        let y_inv = mod_inverse(&y, &d)?;
        self.z = self.z.modpow(&y_inv, &self.n);
        log::trace!("accumulator: deleted element, z updated");
        Ok(())
    }

    /// Produce a fresh witness for `x`, which must already be a member.
    pub fn prove<E: Into<Element>>(&self, x: E) -> Result<Witness, AccumulatorError> {
        let d = self.d.as_ref().ok_or(AccumulatorError::SecretRequired)?;
        let x = x.into();
        let (y, nonce) = map_to_prime(&self.digest, &x, self.config.prime_bits)?;
        let y_inv = mod_inverse(&y, d)?;
        let w = self.z.modpow(&y_inv, &self.n);
        Ok(Witness::new(x, nonce, w))
    }

    /// Check that `witness` is valid against this accumulator's current
    /// `(n, z)`.
    pub fn verify(&self, witness: &Witness) -> bool {
        let y = prime_from_nonce(&self.digest, &witness.x, &witness.nonce, self.config.prime_bits);
        witness.w.modpow(&y, &self.n) == self.z
    }
}
