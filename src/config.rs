//! Tunable constants, exposed as a struct rather than free-floating literals
//! so a caller can override them without forking the crate.

/// The fixed public base the accumulation starts from (`z_0`).
pub const BASE: u64 = 65537;

/// Default RSA modulus bit-length.
pub const MODULUS_BITS: usize = 3072;

/// Default bit-length of the bounded range element primes are drawn from.
pub const PRIME_BITS: usize = 128;

/// Number of Miller-Rabin rounds `PrimeGen` runs once a candidate survives
/// the initial cheap round.
pub const PRIME_GEN_ROUNDS: usize = 24;

/// Number of (deterministic, fixed-base) Miller-Rabin rounds `ElementMap`
/// uses when searching for an element's prime representative.
pub const ELEMENT_MAP_ROUNDS: usize = 24;

/// Upper bound on pair-assembly retries before `PrimeGen` reports
/// `InternalInvariant` instead of looping forever.
pub const MAX_PAIR_ASSEMBLY_RETRIES: usize = 64;

/// Configuration for an accumulator instance.
///
/// The defaults match the wire-level-compatible defaults from the design:
/// a 3072-bit modulus and 128-bit element primes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorConfig {
    /// RSA modulus bit-length.
    pub modulus_bits: usize,
    /// Bit-length of the bounded range element primes are drawn from.
    pub prime_bits: usize,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        AccumulatorConfig {
            modulus_bits: MODULUS_BITS,
            prime_bits: PRIME_BITS,
        }
    }
}

impl AccumulatorConfig {
    /// A configuration tailored for tests and examples: small enough to run
    /// quickly, large enough to exercise the same code paths.
    pub fn insecure_for_tests() -> Self {
        AccumulatorConfig {
            modulus_bits: 256,
            prime_bits: 32,
        }
    }
}
