use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};


/// Correctly sized encapsulation (public) key specific to the target security parameter set. <br>
/// Implements the [`crate::traits::Encaps`] and [`crate::traits::SerDes`] traits.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PublicKey<const PK_LEN: usize>(pub(crate) [u8; PK_LEN]);


/// Correctly sized decapsulation (private) key specific to the target security parameter set. <br>
/// Implements the [`crate::traits::Decaps`] and [`crate::traits::SerDes`] traits.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey<const SK_LEN: usize>(pub(crate) [u8; SK_LEN]);


/// The 32-byte shared secret established by encapsulation/decapsulation. The
/// underlying bytes are extracted with [`SharedSecretKey::into_bytes`]; equality
/// comparisons run in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey(pub(crate) [u8; 32]);

impl SharedSecretKey {
    /// The length of the shared secret in bytes (fixed across security parameter sets).
    pub const LEN: usize = 32;

    /// Consumes the shared secret and returns the underlying byte array.
    #[must_use]
    pub fn into_bytes(self) -> [u8; 32] { self.0 }
}

impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool { self.0.ct_eq(&other.0).into() }
}

// Keeps the secret bytes out of logs and assertion failure output.
impl core::fmt::Debug for SharedSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::write!(f, "SharedSecretKey([redacted; 32])")
    }
}

impl Eq for SharedSecretKey {}


// The internal ring representations: `R` holds a polynomial in the standard
// coefficient domain, `T` holds one in the NTT domain. Coefficients generally
// carry centered representatives in (-q, q); canonicalization happens at the
// byte-encoding boundary.

#[derive(Clone, Copy)]
pub(crate) struct R(pub(crate) [i16; 256]);

#[derive(Clone, Copy)]
pub(crate) struct T(pub(crate) [i16; 256]);

pub(crate) const R0: R = R([0i16; 256]);
pub(crate) const T0: T = T([0i16; 256]);

impl Zeroize for R {
    fn zeroize(&mut self) { self.0.zeroize() }
}

impl Zeroize for T {
    fn zeroize(&mut self) { self.0.zeroize() }
}
