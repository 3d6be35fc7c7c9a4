//! Error taxonomy for the accumulator.
//!
//! Every fallible operation in this crate reports failure by value through
//! `AccumulatorError`; nothing here is retried or swallowed internally.

use failure::Fail;

/// The abstract error kinds from the design's error taxonomy.
#[derive(Debug, Fail)]
pub enum AccumulatorError {
    /// `del` was called with a witness that does not verify against the
    /// accumulator's current state.
    #[fail(display = "witness does not verify against the current accumulator state")]
    WitnessInvalid,

    /// `del`/`prove` (or `add`, which this crate forbids entirely on a
    /// public accumulator) was invoked without the private exponent.
    #[fail(display = "operation requires the holder's private exponent, but this accumulator is public-verifier only")]
    SecretRequired,

    /// `Update::apply` produced a witness that failed its own post-refresh
    /// verification, meaning the witness's prior state did not match the
    /// update's snapshot.
    #[fail(display = "update does not apply cleanly to this witness: its prior state does not match the update's snapshot")]
    UpdateMismatch,

    /// `undo_add`/`undo_del` was asked to remove a prime factor that the
    /// aggregator's running product is not evenly divisible by.
    #[fail(display = "cannot undo absorption of a prime that was not previously absorbed")]
    InvalidDivision,

    /// A public, caller-supplied argument was out of range or otherwise
    /// malformed (not a programming error, a reportable input problem).
    #[fail(display = "invalid argument: {}", _0)]
    BadArgument(String),

    /// An internal invariant that should hold with overwhelming probability
    /// failed to hold (e.g. a prime search wrapped around its bound, or
    /// `PrimeGen` could not produce a correctly sized modulus after a
    /// reasonable number of retries).
    #[fail(display = "internal invariant violated: {}", _0)]
    InternalInvariant(String),
}
