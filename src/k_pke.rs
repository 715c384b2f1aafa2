//! The IND-CPA public key encryption scheme underlying the KEM.

use crate::byte_fns::{
    byte_decode, byte_encode, compress_poly, decompress_poly, decode_message, encode_message,
};
use crate::hashing::{hash_g, prf};
use crate::helpers::{add, add_hat, sub, to_mont};
use crate::ntt::{dot_product, inv_ntt, ntt};
use crate::sampling::{expand_a, sample_poly_cbd};
use crate::types::{R, T, T0};
use zeroize::Zeroize;

/// Draw a noise polynomial from the centered binomial distribution, keyed by
/// `seed` and a domain-separating `nonce`.
fn sample_noise(seed: &[u8; 32], nonce: u8, eta: usize) -> R {
    let mut buf = [0u8; 192];
    prf(seed, nonce, &mut buf[..64 * eta]);
    let p = sample_poly_cbd(eta, &buf[..64 * eta]);
    buf.zeroize();
    p
}

/// Algorithm 4 `Kyber.CPAPKE.KeyGen()` on page 9.
/// Generates an encryption key and a corresponding decryption key.
///
/// **Input**: random seed `d` <br>
/// **Output**: encryption key `ek_pke` of 384·k+32 bytes written in place <br>
/// **Output**: decryption key `dk_pke` of 384·k bytes written in place
pub(crate) fn key_gen<const K: usize>(
    d: &[u8; 32], eta1: usize, ek_pke: &mut [u8], dk_pke: &mut [u8],
) {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "KeyGen: incorrect ek size");
    debug_assert_eq!(dk_pke.len(), 384 * K, "KeyGen: incorrect dk size");
    #[allow(clippy::cast_possible_truncation)] // k is 2, 3 or 4
    let (rho, mut sigma) = hash_g(&[d, &[K as u8]]);

    // 3: generate matrix A_hat ∈ (Z_q^256)^{k×k}
    let a_hat = expand_a::<K>(&rho, false);

    // 9: for i ∈ {0, ..., k−1}   s[i] ← CBD_η1(PRF(σ, N))
    #[allow(clippy::cast_possible_truncation)]
    let s: [R; K] = core::array::from_fn(|i| sample_noise(&sigma, i as u8, eta1));
    #[allow(clippy::cast_possible_truncation)]
    let e: [R; K] = core::array::from_fn(|i| sample_noise(&sigma, (K + i) as u8, eta1));

    // 17: s_hat ← NTT(s), e_hat ← NTT(e)
    let mut s_hat: [T; K] = core::array::from_fn(|i| ntt(&s[i]));
    let mut e_hat: [T; K] = core::array::from_fn(|i| ntt(&e[i]));

    // 19: t_hat ← A_hat ◦ s_hat + e_hat
    let t_hat: [T; K] =
        core::array::from_fn(|i| add_hat(&to_mont(&dot_product(&a_hat[i], &s_hat)), &e_hat[i]));

    // 20-21: ek_pke ← ByteEncode_12(t_hat) ∥ ρ ; dk_pke ← ByteEncode_12(s_hat)
    for i in 0..K {
        byte_encode(&t_hat[i], &mut ek_pke[384 * i..384 * (i + 1)]);
        byte_encode(&s_hat[i], &mut dk_pke[384 * i..384 * (i + 1)]);
    }
    ek_pke[384 * K..].copy_from_slice(&rho);

    sigma.zeroize();
    let mut s = s;
    s.zeroize();
    let mut e = e;
    e.zeroize();
    s_hat.zeroize();
    e_hat.zeroize();
}

/// Algorithm 5 `Kyber.CPAPKE.Enc(pk, m, r)` on page 9.
/// Encrypts a 32-byte message under the encryption key using deterministic coins.
///
/// **Input**: encryption key `ek_pke` of 384·k+32 bytes <br>
/// **Input**: message `m` of 32 bytes <br>
/// **Input**: encryption randomness `coins` of 32 bytes <br>
/// **Output**: ciphertext of 32·(d_u·k + d_v) bytes
///
/// # Errors
/// Returns an error when the encryption key contains a non-canonical coefficient.
pub(crate) fn encrypt<const K: usize, const CT_LEN: usize>(
    du: u32, dv: u32, eta1: usize, eta2: usize, ek_pke: &[u8], m: &[u8; 32], coins: &[u8; 32],
) -> Result<[u8; CT_LEN], &'static str> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "Encrypt: incorrect ek size");
    debug_assert_eq!(CT_LEN, 32 * (du as usize * K + dv as usize), "Encrypt: incorrect ct size");

    // 2-3: t_hat ← ByteDecode_12(ek_pke), ρ ← last 32 bytes of ek_pke
    let mut t_hat = [T0; K];
    for i in 0..K {
        t_hat[i] = byte_decode(&ek_pke[384 * i..384 * (i + 1)])?;
    }
    let rho: &[u8; 32] = ek_pke[384 * K..].try_into().map_err(|_| "Encrypt: internal")?;

    // 4-8: generate matrix A_hat^T ∈ (Z_q^256)^{k×k}
    let at_hat = expand_a::<K>(rho, true);

    // 9-16: sample r ← CBD_η1, e1 ← CBD_η2, e2 ← CBD_η2
    #[allow(clippy::cast_possible_truncation)]
    let r: [R; K] = core::array::from_fn(|i| sample_noise(coins, i as u8, eta1));
    #[allow(clippy::cast_possible_truncation)]
    let e1: [R; K] = core::array::from_fn(|i| sample_noise(coins, (K + i) as u8, eta2));
    #[allow(clippy::cast_possible_truncation)]
    let mut e2 = sample_noise(coins, (2 * K) as u8, eta2);

    // 17: r_hat ← NTT(r)
    let mut r_hat: [T; K] = core::array::from_fn(|i| ntt(&r[i]));

    // 18: u ← NTT^{-1}(A_hat^T ◦ r_hat) + e1
    let u: [R; K] =
        core::array::from_fn(|i| add(&inv_ntt(&dot_product(&at_hat[i], &r_hat)), &e1[i]));

    // 19-20: v ← NTT^{-1}(t_hat ◦ r_hat) + e2 + Decompress_1(m)
    let v = add(&add(&inv_ntt(&dot_product(&t_hat, &r_hat)), &e2), &encode_message(m));

    // 21-22: c ← Compress_du(u) ∥ Compress_dv(v)
    let step = 32 * du as usize;
    let mut ct = [0u8; CT_LEN];
    for i in 0..K {
        compress_poly(&u[i], du, &mut ct[step * i..step * (i + 1)]);
    }
    compress_poly(&v, dv, &mut ct[step * K..]);

    let mut r = r;
    r.zeroize();
    r_hat.zeroize();
    let mut e1 = e1;
    e1.zeroize();
    e2.zeroize();
    Ok(ct)
}

/// Algorithm 6 `Kyber.CPAPKE.Dec(sk, c)` on page 10.
/// Recovers the 32-byte message from a ciphertext using the decryption key.
///
/// **Input**: decryption key `dk_pke` of 384·k bytes <br>
/// **Input**: ciphertext `ct` of 32·(d_u·k + d_v) bytes <br>
/// **Output**: message of 32 bytes
///
/// # Errors
/// Returns an error when the decryption key contains a non-canonical coefficient.
pub(crate) fn decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], &'static str> {
    debug_assert_eq!(dk_pke.len(), 384 * K, "Decrypt: incorrect dk size");
    debug_assert_eq!(ct.len(), 32 * (du as usize * K + dv as usize), "Decrypt: incorrect ct size");

    // 2-4: u ← Decompress_du(c1), v ← Decompress_dv(c2)
    let step = 32 * du as usize;
    let mut u_hat = [T0; K];
    for i in 0..K {
        u_hat[i] = ntt(&decompress_poly(&ct[step * i..step * (i + 1)], du));
    }
    let v = decompress_poly(&ct[step * K..], dv);

    // 5: s_hat ← ByteDecode_12(dk_pke)
    let mut s_hat = [T0; K];
    for i in 0..K {
        s_hat[i] = byte_decode(&dk_pke[384 * i..384 * (i + 1)])?;
    }

    // 6: w ← v − NTT^{-1}(s_hat ◦ NTT(u))
    let mut w = sub(&v, &inv_ntt(&dot_product(&s_hat, &u_hat)));

    // 7: m ← Compress_1(w)
    let m = decode_message(&w);

    s_hat.zeroize();
    w.zeroize();
    Ok(m)
}
