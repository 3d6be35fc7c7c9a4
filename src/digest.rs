//! The "digest provider" capability described in the design notes: either a
//! named identifier (resolved to a concrete hash) or a caller-supplied
//! callable, modeled uniformly as a trait object so `Accumulator`, `Witness`
//! and `Update` can hold and clone a handle to it without a generic
//! parameter leaking through the whole public API.

use std::fmt;
use std::sync::Arc;

use blake2::digest::VariableOutput;
use blake2::VarBlake2b;
use sha2::{Digest as Sha2Digest, Sha256, Sha384, Sha512};

/// Minimum output width, in bits, any provider must guarantee so that
/// `ElementMap` always has `PRIME_BITS` worth of digest material to work
/// with (spec: "a callable taking bytes and returning at least PRIME_BITS
/// bits of digest").
pub const MIN_OUTPUT_BITS: usize = 128;

/// A collision-resistant digest primitive, named or custom.
///
/// Implementations must be deterministic and side-effect free: `digest` is
/// called repeatedly for the same input across the lifetime of an
/// accumulator and its witnesses, and must always return the same bytes.
pub trait DigestProvider: fmt::Debug + Send + Sync {
    /// Hash `input`, returning a fixed-width byte string.
    fn digest(&self, input: &[u8]) -> Vec<u8>;

    /// Width, in bits, of the byte string `digest` returns.
    fn output_bits(&self) -> usize;
}

/// A cheap, clonable handle to a digest provider.
pub type DigestHandle = Arc<dyn DigestProvider>;

#[derive(Debug)]
struct Sha256Provider;

impl DigestProvider for Sha256Provider {
    fn digest(&self, input: &[u8]) -> Vec<u8> {
        Sha256::digest(input).to_vec()
    }

    fn output_bits(&self) -> usize {
        256
    }
}

#[derive(Debug)]
struct Sha384Provider;

impl DigestProvider for Sha384Provider {
    fn digest(&self, input: &[u8]) -> Vec<u8> {
        Sha384::digest(input).to_vec()
    }

    fn output_bits(&self) -> usize {
        384
    }
}

#[derive(Debug)]
struct Sha512Provider;

impl DigestProvider for Sha512Provider {
    fn digest(&self, input: &[u8]) -> Vec<u8> {
        Sha512::digest(input).to_vec()
    }

    fn output_bits(&self) -> usize {
        512
    }
}

/// Variable-output Blake2b, kept because the accumulator this crate is
/// grounded on already depends on `blake2` for its own hash-to-prime helper.
#[derive(Debug)]
struct Blake2b512Provider;

impl DigestProvider for Blake2b512Provider {
    fn digest(&self, input: &[u8]) -> Vec<u8> {
        let mut hasher = VarBlake2b::new(64).expect("64 is a valid blake2b output size");
        hasher.input(input);
        let mut out = Vec::with_capacity(64);
        hasher.variable_result(|bytes| out.extend_from_slice(bytes));
        out
    }

    fn output_bits(&self) -> usize {
        512
    }
}

/// Named digest identifiers a caller may select without constructing a
/// provider themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestId {
    /// SHA-256 — the reference default.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// Blake2b, 512-bit output.
    Blake2b512,
}

impl DigestId {
    /// Resolve this identifier to a concrete provider handle.
    pub fn resolve(self) -> DigestHandle {
        match self {
            DigestId::Sha256 => Arc::new(Sha256Provider),
            DigestId::Sha384 => Arc::new(Sha384Provider),
            DigestId::Sha512 => Arc::new(Sha512Provider),
            DigestId::Blake2b512 => Arc::new(Blake2b512Provider),
        }
    }
}

impl Default for DigestId {
    fn default() -> Self {
        DigestId::Sha256
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        for id in &[
            DigestId::Sha256,
            DigestId::Sha384,
            DigestId::Sha512,
            DigestId::Blake2b512,
        ] {
            let provider = id.resolve();
            let a = provider.digest(b"hello world");
            let b = provider.digest(b"hello world");
            assert_eq!(a, b);
            assert!(provider.output_bits() >= MIN_OUTPUT_BITS);
            assert_eq!(a.len() * 8, provider.output_bits());
        }
    }

    #[test]
    fn digest_distinguishes_input() {
        let provider = DigestId::Sha256.resolve();
        assert_ne!(provider.digest(b"a"), provider.digest(b"b"));
    }
}
