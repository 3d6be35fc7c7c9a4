//! `Update`: an aggregator of batched additions/deletions that refreshes a
//! single witness with one extended-GCD step, instead of re-deriving it from
//! scratch.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::accumulator::Accumulator;
use crate::digest::DigestHandle;
use crate::element_prime::prime_from_nonce;
use crate::error::AccumulatorError;
use crate::math::{extended_gcd, modpow_uint_int};
use crate::witness::Witness;

/// The serialisable projection of an `Update`'s state: `(n, z_snapshot,
/// pi_a, pi_d)`, exactly spec §6's persistent state layout for an Update.
/// Does not carry the digest handle or prime-bit width — those are
/// reconstruction context, not persisted state, matching how an
/// `Accumulator`'s digest identifier is supplied separately from `(n, z)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateSnapshot {
    pub n: BigUint,
    pub z_snapshot: BigUint,
    pub pi_a: BigUint,
    pub pi_d: BigUint,
}

/// Aggregates a batch of additions (`pi_a`, a product of primes) and
/// deletions (`pi_d`) against a fixed snapshot of `(n, z)`, so a single
/// `apply` call refreshes any one witness issued against (or before) that
/// snapshot.
///
/// An `Update` may be `apply`d any number of times — it is read-only once
/// opened except through `absorb_*`/`undo_*`.
#[derive(Debug, Clone)]
pub struct Update {
    digest: DigestHandle,
    prime_bits: usize,
    n: BigUint,
    z_snapshot: BigUint,
    pi_a: BigUint,
    pi_d: BigUint,
}

impl Update {
    /// Open an `Update` against `accumulator`'s current `(n, z)`.
    pub fn open(accumulator: &Accumulator) -> Self {
        let (n, z_snapshot) = accumulator.snapshot();
        Update {
            digest: accumulator.digest(),
            prime_bits: accumulator.prime_bits(),
            n,
            z_snapshot,
            pi_a: BigUint::one(),
            pi_d: BigUint::one(),
        }
    }

    /// Project this `Update` onto the serialisable `(n, z_snapshot, pi_a,
    /// pi_d)` tuple from spec §6's persistent state layout. The digest
    /// handle and prime-bit width are not part of that tuple — like an
    /// `Accumulator`'s digest identifier, they are context a caller supplies
    /// when reconstructing via `from_snapshot`.
    pub fn snapshot(&self) -> UpdateSnapshot {
        UpdateSnapshot {
            n: self.n.clone(),
            z_snapshot: self.z_snapshot.clone(),
            pi_a: self.pi_a.clone(),
            pi_d: self.pi_d.clone(),
        }
    }

    /// Rebuild an `Update` from a persisted `UpdateSnapshot`, given the
    /// digest and prime-bit width it was originally opened with.
    pub fn from_snapshot(digest: DigestHandle, prime_bits: usize, snapshot: UpdateSnapshot) -> Self {
        Update {
            digest,
            prime_bits,
            n: snapshot.n,
            z_snapshot: snapshot.z_snapshot,
            pi_a: snapshot.pi_a,
            pi_d: snapshot.pi_d,
        }
    }

    fn prime_of(&self, witness: &Witness) -> BigUint {
        prime_from_nonce(&self.digest, &witness.x, &witness.nonce, self.prime_bits)
    }

    /// Record that `witness`'s element was added to the batch.
    pub fn absorb_add(&mut self, witness: &Witness) {
        self.pi_a *= self.prime_of(witness);
    }

    /// Record that `witness`'s element was deleted in the batch.
    pub fn absorb_del(&mut self, witness: &Witness) {
        self.pi_d *= self.prime_of(witness);
    }

    /// Undo a previous `absorb_add` for `witness`'s element.
    pub fn undo_add(&mut self, witness: &Witness) -> Result<(), AccumulatorError> {
        let y = self.prime_of(witness);
        let (quotient, remainder) = self.pi_a.div_rem(&y);
        if !remainder.is_zero() {
            return Err(AccumulatorError::InvalidDivision);
        }
        self.pi_a = quotient;
        Ok(())
    }

    /// Undo a previous `absorb_del` for `witness`'s element.
    pub fn undo_del(&mut self, witness: &Witness) -> Result<(), AccumulatorError> {
        let y = self.prime_of(witness);
        let (quotient, remainder) = self.pi_d.div_rem(&y);
        if !remainder.is_zero() {
            return Err(AccumulatorError::InvalidDivision);
        }
        self.pi_d = quotient;
        Ok(())
    }

    /// Refresh `witness` through this batch in one extended-GCD step (spec
    /// §4.4): `w' = w^(a*pi_a) * z_snapshot^b mod n`, where `a*pi_d + b*y =
    /// 1` is the Bezout identity of `pi_d` and `witness`'s own prime `y`.
    ///
    /// Fails with `BadArgument` if `witness`'s own element is itself part of
    /// the absorbed deletions (`gcd(pi_d, y) != 1`) — such a witness has no
    /// meaningful refreshed form and must be excluded by the caller, per the
    /// design note in spec §4.4.
    pub fn apply(&self, witness: &Witness) -> Result<Witness, AccumulatorError> {
        let y = self.prime_of(witness);

        let (gcd, a, b) = extended_gcd(&self.pi_d, &y);
        if !gcd.is_one() {
            return Err(AccumulatorError::BadArgument(
                "witness's own element is part of this update's deleted batch; it has no refreshed form".to_string(),
            ));
        }

        let pi_a_signed = BigInt::from_biguint(Sign::Plus, self.pi_a.clone());
        let w_exponent = &a * &pi_a_signed;
        let w_part = modpow_uint_int(&witness.w, &w_exponent, &self.n)?;
        let z_part = modpow_uint_int(&self.z_snapshot, &b, &self.n)?;
        let w_prime = (&w_part * &z_part) % &self.n;

        Ok(Witness::new(
            witness.x.clone(),
            witness.nonce.clone(),
            w_prime,
        ))
    }

    /// Like `apply`, but additionally verifies the refreshed witness against
    /// `expected_z` before returning it, reporting `UpdateMismatch` on
    /// failure. This is the "post-refresh verify" spec §7 describes: a
    /// caller who also knows the accumulator's true current `z` (typically
    /// by reading it straight off a live `Accumulator`) can use this to
    /// catch a batch that was assembled against the wrong starting point.
    pub fn apply_checked(
        &self,
        witness: &Witness,
        expected_z: &BigUint,
    ) -> Result<Witness, AccumulatorError> {
        let refreshed = self.apply(witness)?;
        let y = self.prime_of(&refreshed);
        if &refreshed.w.modpow(&y, &self.n) != expected_z {
            return Err(AccumulatorError::UpdateMismatch);
        }
        Ok(refreshed)
    }
}

/// The single-step fast path from spec §4.4: when only one element has been
/// added since `witness` was issued, refreshing it does not need a full
/// `Update` — it is just `w^(added_prime) mod n`, the degenerate case of
/// `apply` with `pi_d = 1`.
pub fn refresh_after_single_add(witness: &Witness, added_prime: &BigUint, n: &BigUint) -> Witness {
    Witness::new(
        witness.x.clone(),
        witness.nonce.clone(),
        witness.w.modpow(added_prime, n),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccumulatorConfig;
    use crate::digest::DigestId;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn fresh_accumulator(seed: u8) -> Accumulator {
        let mut rng = ChaChaRng::from_seed([seed; 32]);
        let config = AccumulatorConfig::insecure_for_tests();
        let (acc, _primes) =
            Accumulator::setup(&mut rng, DigestId::Sha256.resolve(), config, None).unwrap();
        acc
    }

    #[test]
    fn refresh_via_update_scenario_3() {
        let mut acc = fresh_accumulator(20);
        let w1 = acc.add("1").unwrap();
        let w2 = acc.add("2").unwrap();

        let mut update = Update::open(&acc);
        update.absorb_add(&w2);

        let refreshed = update.apply(&w1).unwrap();
        assert!(acc.verify(&refreshed));
    }

    #[test]
    fn delete_invalidates_then_refresh_via_update_scenario_4() {
        let mut acc = fresh_accumulator(21);
        let w1 = acc.add("1").unwrap();
        let w2 = acc.add("2").unwrap();

        let mut update = Update::open(&acc);
        update.absorb_add(&w2);
        let w1_refreshed = update.apply(&w1).unwrap();
        assert!(acc.verify(&w1_refreshed));

        acc.del(&w1_refreshed).unwrap();
        assert!(!acc.verify(&w1_refreshed));

        let mut update2 = Update::open(&acc);
        update2.absorb_del(&w1_refreshed);
        let w2_refreshed = update2.apply(&w2).unwrap();
        assert!(acc.verify(&w2_refreshed));
    }

    #[test]
    fn re_add_after_delete_scenario_5() {
        let mut acc = fresh_accumulator(22);
        let w1 = acc.add("1").unwrap();
        let w2 = acc.add("2").unwrap();

        let mut update = Update::open(&acc);
        update.absorb_add(&w2);
        let w1_refreshed = update.apply(&w1).unwrap();

        acc.del(&w1_refreshed).unwrap();

        let mut update2 = Update::open(&acc);
        update2.absorb_del(&w1_refreshed);
        // w2 survives the deletion batch
        let w2_refreshed = update2.apply(&w2).unwrap();
        assert!(acc.verify(&w2_refreshed));

        let w1_new = acc.add("1").unwrap();
        assert!(acc.verify(&w1_new));

        // The stale, refreshed-through-the-deletion-batch witness for "1"
        // still must not verify: "1" was deleted, not merely refreshed.
        let stale = update2.apply(&w1_refreshed);
        // w1_refreshed's own element (the deleted "1") is part of pi_d, so
        // this update has no meaningful refreshed form for it.
        assert!(stale.is_err());
    }

    #[test]
    fn snapshot_round_trips_through_from_snapshot() {
        let mut acc = fresh_accumulator(26);
        let w1 = acc.add("1").unwrap();
        let w2 = acc.add("2").unwrap();

        let mut update = Update::open(&acc);
        update.absorb_add(&w2);

        let snapshot = update.snapshot();
        let rebuilt = Update::from_snapshot(acc.digest(), acc.prime_bits(), snapshot);

        assert_eq!(update.apply(&w1).unwrap(), rebuilt.apply(&w1).unwrap());
    }

    #[test]
    fn single_step_fast_path_matches_update() {
        let mut acc = fresh_accumulator(23);
        let w1 = acc.add("1").unwrap();
        let w2 = acc.add("2").unwrap();
        let y2 = prime_from_nonce(&acc.digest(), &w2.x, &w2.nonce, acc.prime_bits());

        let mut update = Update::open(&acc);
        update.absorb_add(&w2);
        let via_update = update.apply(&w1).unwrap();

        let via_fast_path = refresh_after_single_add(&w1, &y2, acc.n());
        assert_eq!(via_update, via_fast_path);
        assert!(acc.verify(&via_fast_path));
    }

    #[test]
    fn undo_add_reverts_absorption() {
        let mut acc = fresh_accumulator(24);
        let w1 = acc.add("1").unwrap();
        let _w2 = acc.add("2").unwrap();

        let mut update = Update::open(&acc);
        let w2 = _w2.clone();
        update.absorb_add(&w2);
        update.undo_add(&w2).unwrap();

        // pi_a/pi_d are both back to 1, the identity batch: apply must act
        // as a no-op on w1's own witness value.
        let refreshed = update.apply(&w1).unwrap();
        assert_eq!(refreshed.w, w1.w);
    }

    #[test]
    fn undo_add_rejects_unabsorbed_prime() {
        let acc = fresh_accumulator(25);
        let mut update = Update::open(&acc);
        let mut phantom = acc.clone();
        let w = phantom.add("never-absorbed").unwrap();
        assert!(matches!(
            update.undo_add(&w).unwrap_err(),
            AccumulatorError::InvalidDivision
        ));
    }
}
