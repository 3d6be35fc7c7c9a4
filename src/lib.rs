//! A cryptographic accumulator over the RSA group: a constant-size
//! commitment to a dynamic multiset of byte-string elements.
//!
//! The accumulator holder controls a private factorisation of an RSA
//! modulus and can add or delete elements; any party holding the public
//! modulus can verify a membership witness and, given the sequence of
//! published updates, maintain a witness over time without consulting the
//! holder.
//!
//! ```
//! use accumulators::{Accumulator, AccumulatorConfig, DigestId, Update};
//! use rand::SeedableRng;
//! use rand_chacha::ChaChaRng;
//!
//! let mut rng = ChaChaRng::from_seed([0u8; 32]);
//! let config = AccumulatorConfig::insecure_for_tests();
//! let (mut acc, _primes) =
//!     Accumulator::setup(&mut rng, DigestId::Sha256.resolve(), config, None).unwrap();
//!
//! let w1 = acc.add("alice").unwrap();
//! let w2 = acc.add("bob").unwrap();
//! assert!(!acc.verify(&w1)); // stale: "bob" was added after "alice"'s witness
//! assert!(acc.verify(&w2));
//!
//! let mut update = Update::open(&acc);
//! update.absorb_add(&w2);
//! let w1_refreshed = update.apply(&w1).unwrap();
//! assert!(acc.verify(&w1_refreshed));
//! ```

mod accumulator;
mod config;
mod digest;
mod element;
mod element_prime;
mod error;
mod math;
mod prime_gen;
mod primality;
mod update;
mod witness;

pub use accumulator::Accumulator;
pub use config::{AccumulatorConfig, BASE, ELEMENT_MAP_ROUNDS, MODULUS_BITS, PRIME_BITS, PRIME_GEN_ROUNDS};
pub use digest::{DigestHandle, DigestId, DigestProvider};
pub use element::Element;
pub use error::AccumulatorError;
pub use prime_gen::{generate_primes, Primes};
pub use update::{refresh_after_single_add, Update, UpdateSnapshot};
pub use witness::Witness;
