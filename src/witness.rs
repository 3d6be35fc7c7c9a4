//! `Witness`: a self-contained membership proof `(x, nonce, w)`.

use num_bigint::BigUint;

use crate::element::Element;

/// A membership witness. Valid against an accumulator's current `(n, z)`
/// iff `w^(H(x) + nonce) mod n == z`.
///
/// Immutable once constructed: refreshing a witness (via `Update::apply` or
/// the single-step fast path) produces a new `Witness`, it never mutates one
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Witness {
    /// The element this witness attests membership for.
    pub x: Element,
    /// `nonce` such that `H(x) + nonce` is the element's prime
    /// representative.
    pub nonce: BigUint,
    /// The witness value itself.
    pub w: BigUint,
}

impl Witness {
    /// Construct a witness directly. Exposed for callers deserializing a
    /// witness from the persistent layout in spec §6; ordinary callers get
    /// a `Witness` from `Accumulator::add`/`Accumulator::prove` instead.
    pub fn new(x: Element, nonce: BigUint, w: BigUint) -> Self {
        Witness { x, nonce, w }
    }
}
