// The symmetric primitive suite: domain-separated hashing, matrix expansion
// and noise-seed derivation, built on SHA3-256/512 and SHAKE-128/256.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};


/// Function `H(s) = SHA3-256(s)`; hashes a list of byte-slice references.
pub(crate) fn hash_h(v: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    v.iter().for_each(|b| Digest::update(&mut hasher, b));
    hasher.finalize().into()
}


/// Function `G(s) = SHA3-512(s)`; hashes a list of byte-slice references and
/// returns the two 32-byte halves of the digest.
pub(crate) fn hash_g(v: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    v.iter().for_each(|b| Digest::update(&mut hasher, b));
    let digest = hasher.finalize();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    a.copy_from_slice(&digest[0..32]);
    b.copy_from_slice(&digest[32..64]);
    (a, b)
}


/// Function `XOF(rho, x, y)`: absorbs the 32-byte matrix seed and two domain
/// bytes into Shake128. Returns a xof reader squeezable indefinitely.
pub(crate) fn xof(rho: &[u8; 32], x: u8, y: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[x, y]);
    hasher.finalize_xof()
}


/// Function `PRF_eta(sigma, nonce)`: absorbs the 32-byte noise seed and one
/// nonce byte into Shake256, then squeezes `eta * 64` bytes into `out`.
pub(crate) fn prf(sigma: &[u8; 32], nonce: u8, out: &mut [u8]) {
    let mut hasher = Shake256::default();
    hasher.update(sigma);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    reader.read(out);
}


/// Function `KDF(s) = SHAKE-256(s, 32)`; derives the fixed-length shared
/// secret from a list of byte-slice references.
pub(crate) fn kdf(v: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    v.iter().for_each(|b| hasher.update(b));
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; 32];
    reader.read(&mut out);
    out
}
