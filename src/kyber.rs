//! The CCA-secure KEM built from the IND-CPA scheme via the Fujisaki-Okamoto
//! transform with implicit rejection.

use crate::byte_fns::byte_decode;
use crate::hashing::{hash_g, hash_h, kdf};
use crate::k_pke;
use crate::types::{PrivateKey, PublicKey, SharedSecretKey};
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Algorithm 7 `Kyber.CCAKEM.KeyGen()` on page 10.
/// Generates an encapsulation key and a corresponding decapsulation key.
///
/// **Output**: encapsulation key `ek` of 384·k+32 bytes <br>
/// **Output**: decapsulation key `dk` of 768·k+96 bytes
///
/// # Errors
/// Returns an error when the random number generator fails.
pub(crate) fn key_gen<const K: usize, const EK_LEN: usize, const DK_LEN: usize>(
    rng: &mut impl CryptoRngCore, eta1: usize,
) -> Result<(PublicKey<EK_LEN>, PrivateKey<DK_LEN>), &'static str> {
    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| "Random number generator failed")?;
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z).map_err(|_| "Random number generator failed")?;
    let keys = key_gen_from_seed::<K, EK_LEN, DK_LEN>(&d, &z, eta1);
    d.zeroize();
    z.zeroize();
    Ok(keys)
}

/// Deterministic portion of `Kyber.CCAKEM.KeyGen()` operating on fixed seeds,
/// used both by `key_gen` above and by known-answer testing.
///
/// **Input**: key generation seed `d` of 32 bytes <br>
/// **Input**: implicit rejection seed `z` of 32 bytes <br>
/// **Output**: encapsulation key `ek` and decapsulation key `dk`
pub(crate) fn key_gen_from_seed<const K: usize, const EK_LEN: usize, const DK_LEN: usize>(
    d: &[u8; 32], z: &[u8; 32], eta1: usize,
) -> (PublicKey<EK_LEN>, PrivateKey<DK_LEN>) {
    debug_assert_eq!(EK_LEN, 384 * K + 32, "KeyGen: incorrect ek size");
    debug_assert_eq!(DK_LEN, 768 * K + 96, "KeyGen: incorrect dk size");
    let mut ek = PublicKey([0u8; EK_LEN]);
    let mut dk = PrivateKey([0u8; DK_LEN]);

    // 1-2: (ek_pke, dk_pke) ← Kyber.CPAPKE.KeyGen()
    let (dk_pke, rest) = dk.0.split_at_mut(384 * K);
    let (ek_copy, tail) = rest.split_at_mut(EK_LEN);
    k_pke::key_gen::<K>(d, eta1, &mut ek.0, dk_pke);

    // 3: dk ← dk_pke ∥ ek ∥ H(ek) ∥ z
    ek_copy.copy_from_slice(&ek.0);
    tail[..32].copy_from_slice(&hash_h(&[&ek.0]));
    tail[32..].copy_from_slice(z);
    (ek, dk)
}

/// Algorithm 8 `Kyber.CCAKEM.Enc(pk)` on page 10.
/// Encapsulates a fresh shared secret against the given encapsulation key.
///
/// **Input**: encapsulation key `ek` of 384·k+32 bytes <br>
/// **Output**: shared secret of 32 bytes <br>
/// **Output**: ciphertext of 32·(d_u·k + d_v) bytes
///
/// # Errors
/// Returns an error when the random number generator fails or the
/// encapsulation key contains a non-canonical coefficient.
pub(crate) fn encaps<const K: usize, const CT_LEN: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, eta1: usize, eta2: usize, ek: &[u8],
) -> Result<(SharedSecretKey, [u8; CT_LEN]), &'static str> {
    // 1: m ← B^32
    let mut m = [0u8; 32];
    rng.try_fill_bytes(&mut m).map_err(|_| "Random number generator failed")?;

    // 2: (K_bar, r) ← G(m ∥ H(ek))
    let (mut k_bar, mut coins) = hash_g(&[&m, &hash_h(&[ek])]);

    // 3: c ← Kyber.CPAPKE.Enc(ek, m, r)
    let ct = k_pke::encrypt::<K, CT_LEN>(du, dv, eta1, eta2, ek, &m, &coins)?;

    // 4: K ← KDF(K_bar ∥ H(c))
    let ss = SharedSecretKey(kdf(&[&k_bar, &hash_h(&[&ct])]));

    m.zeroize();
    k_bar.zeroize();
    coins.zeroize();
    Ok((ss, ct))
}

/// Algorithm 9 `Kyber.CCAKEM.Dec(c, sk)` on page 10.
/// Decapsulates the shared secret from a ciphertext, silently substituting a
/// pseudorandom value when the ciphertext fails the re-encryption check.
///
/// **Input**: decapsulation key `dk` of 768·k+96 bytes <br>
/// **Input**: ciphertext `ct` of 32·(d_u·k + d_v) bytes <br>
/// **Output**: shared secret of 32 bytes
///
/// # Errors
/// Returns an error when the decapsulation key contains a non-canonical
/// coefficient. Ciphertext mismatch is not an error.
pub(crate) fn decaps<const K: usize, const CT_LEN: usize>(
    du: u32, dv: u32, eta1: usize, eta2: usize, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, &'static str> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "Decaps: incorrect dk size");

    // 1-4: split dk into dk_pke ∥ ek ∥ H(ek) ∥ z
    let (dk_pke, rest) = dk.split_at(384 * K);
    let (ek, tail) = rest.split_at(384 * K + 32);
    let (h_ek, z) = tail.split_at(32);

    // 5: m' ← Kyber.CPAPKE.Dec(dk_pke, c)
    let mut m_prime = k_pke::decrypt::<K>(du, dv, dk_pke, ct)?;

    // 6: (K_bar', r') ← G(m' ∥ H(ek))
    let (mut k_bar_prime, mut coins_prime) = hash_g(&[&m_prime, h_ek]);

    // 7: c' ← Kyber.CPAPKE.Enc(ek, m', r')
    let mut ct_prime = k_pke::encrypt::<K, CT_LEN>(du, dv, eta1, eta2, ek, &m_prime, &coins_prime)?;

    // 8-11: K ← KDF(K_bar' ∥ H(c)) if c = c', else KDF(z ∥ H(c)), selected
    // without branching on the comparison result
    let select = ct[..].ct_eq(&ct_prime[..]);
    let mut pre = [0u8; 32];
    for i in 0..32 {
        pre[i] = u8::conditional_select(&z[i], &k_bar_prime[i], select);
    }
    let ss = SharedSecretKey(kdf(&[&pre, &hash_h(&[ct])]));

    m_prime.zeroize();
    k_bar_prime.zeroize();
    coins_prime.zeroize();
    ct_prime.zeroize();
    pre.zeroize();
    Ok(ss)
}

/// Confirm that every 12-bit coefficient of a serialized encapsulation key is
/// canonical, so `ByteDecode ∘ ByteEncode` is the identity on it.
pub(crate) fn validate_ek<const K: usize>(ek: &[u8]) -> Result<(), &'static str> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "Validate: incorrect ek size");
    for i in 0..K {
        let _ = byte_decode(&ek[384 * i..384 * (i + 1)])?;
    }
    Ok(())
}

/// Confirm that a serialized decapsulation key is self-consistent: canonical
/// coefficients throughout and a correct embedded hash of the encapsulation key.
pub(crate) fn validate_dk<const K: usize>(dk: &[u8]) -> Result<(), &'static str> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "Validate: incorrect dk size");
    let (dk_pke, rest) = dk.split_at(384 * K);
    let (ek, tail) = rest.split_at(384 * K + 32);
    for i in 0..K {
        let _ = byte_decode(&dk_pke[384 * i..384 * (i + 1)])?;
    }
    validate_ek::<K>(ek)?;
    let ok: bool = hash_h(&[ek])[..].ct_eq(&tail[..32]).into();
    if ok {
        Ok(())
    } else {
        Err("Decapsulation key hash check failed")
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    const K: usize = 2;
    const EK_LEN: usize = 384 * K + 32;
    const DK_LEN: usize = 768 * K + 96;
    const CT_LEN: usize = 32 * (10 * K + 4);
    const ETA1: usize = 3;
    const ETA2: usize = 2;

    fn keypair() -> (PublicKey<EK_LEN>, PrivateKey<DK_LEN>) {
        key_gen_from_seed::<K, EK_LEN, DK_LEN>(&[0x11u8; 32], &[0x22u8; 32], ETA1)
    }

    #[test]
    fn encaps_decaps_agree() {
        let (ek, dk) = keypair();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let (ss1, ct) = encaps::<K, CT_LEN>(&mut rng, 10, 4, ETA1, ETA2, &ek.0).unwrap();
        let ss2 = decaps::<K, CT_LEN>(10, 4, ETA1, ETA2, &dk.0, &ct).unwrap();
        assert_eq!(ss1, ss2);
    }

    #[test]
    fn corrupt_ciphertext_rejects_implicitly() {
        let (ek, dk) = keypair();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        let (ss1, mut ct) = encaps::<K, CT_LEN>(&mut rng, 10, 4, ETA1, ETA2, &ek.0).unwrap();
        ct[0] ^= 1;
        let ss2 = decaps::<K, CT_LEN>(10, 4, ETA1, ETA2, &dk.0, &ct).unwrap();
        assert_ne!(ss1, ss2); // no error, just a different secret
    }

    #[test]
    fn dk_validation_catches_tampered_hash() {
        let (_, mut dk) = keypair();
        assert!(validate_dk::<K>(&dk.0).is_ok());
        dk.0[DK_LEN - 64] ^= 1; // inside the stored H(ek)
        assert!(validate_dk::<K>(&dk.0).is_err());
    }
}
