// Number-Theoretic Transform over Z_q[X]/(X^256 + 1), which factors into 128
// quotient rings Z_q[X]/(X^2 - ζ^brv7(i)); base multiplication works pair-wise
// in those degree-2 quotients.

use crate::helpers::{barrett_reduce, mont_reduce, ZETA_TABLE_MONT};
use crate::types::{R, T, T0};
use crate::Q;


/// Forward Number-Theoretic Transform; seven radix-2 layers of Montgomery
/// butterflies over the precomputed bit-reversed zeta table, followed by one
/// Barrett pass to bound coefficient growth.
///
/// **Input**: polynomial `w(X) = ∑_{j=0}^{255} w_j X^j ∈ R_q` <br>
/// **Output**: `w_hat = (w_hat[0], ... , w_hat[255]) ∈ T_q`
pub(crate) fn ntt(w: &R) -> T {
    let mut w_hat = T(w.0);
    let mut m = 0;
    let mut len = 128;
    while len >= 2 {
        let mut start = 0;
        while start < 256 {
            m += 1;
            let zeta = i32::from(ZETA_TABLE_MONT[m]);
            for j in start..(start + len) {
                let t = mont_reduce(zeta * i32::from(w_hat.0[j + len]));
                w_hat.0[j + len] = w_hat.0[j].wrapping_sub(t);
                w_hat.0[j] = w_hat.0[j].wrapping_add(t);
            }
            start += 2 * len;
        }
        len >>= 1;
    }
    // seven layers grow |coeff| toward 8q; bring back under q
    for c in &mut w_hat.0 {
        *c = barrett_reduce(*c);
    }
    w_hat
}


/// Inverse Number-Theoretic Transform. The final multiply by
/// `2^25 mod q = 128^(-1) * 2^16 mod q` folds the transform's `1/128` scaling
/// together with one Montgomery factor, matching the factor consumed by each
/// preceding [`multiply_ntts`].
///
/// **Input**: `w_hat = (w_hat[0], ... , w_hat[255]) ∈ T_q` <br>
/// **Output**: polynomial `w(X) = ∑_{j=0}^{255} w_j X^j ∈ R_q`
pub(crate) fn inv_ntt(w_hat: &T) -> R {
    const F_MONT: i32 = (1 << 25) % (Q as i32);
    let mut w = R(w_hat.0);
    let mut m = 128;
    let mut len = 2;
    while len <= 128 {
        let mut start = 0;
        while start < 256 {
            m -= 1;
            let zeta = i32::from(ZETA_TABLE_MONT[m]);
            for j in start..(start + len) {
                let t = w.0[j];
                w.0[j] = barrett_reduce(t.wrapping_add(w.0[j + len]));
                w.0[j + len] = mont_reduce(zeta * i32::from(w.0[j + len].wrapping_sub(t)));
            }
            start += 2 * len;
        }
        len <<= 1;
    }
    for c in &mut w.0 {
        *c = mont_reduce(F_MONT * i32::from(*c));
    }
    w
}


/// One base multiplication in `Z_q[X]/(X^2 - zeta)`: combines the coefficient
/// pairs `(a0, a1)` and `(b0, b1)` into the product pair. `zeta` carries a
/// Montgomery factor, so every output term ends up scaled by exactly `2^(-16)`.
fn base_case_multiply(a0: i16, a1: i16, b0: i16, b1: i16, zeta: i32) -> (i16, i16) {
    let mut c0 = mont_reduce(i32::from(a1) * i32::from(b1));
    c0 = mont_reduce(i32::from(c0) * zeta);
    c0 = c0.wrapping_add(mont_reduce(i32::from(a0) * i32::from(b0)));
    let c1 = mont_reduce(i32::from(a0) * i32::from(b1))
        .wrapping_add(mont_reduce(i32::from(a1) * i32::from(b0)));
    (c0, c1)
}


/// NTT-domain multiplication: 128 degree-2 base multiplications, the second of
/// each pair against the negated twiddle. Output coefficients are bounded by
/// `2q` in magnitude and carry one Montgomery `2^(-16)` factor.
pub(crate) fn multiply_ntts(a: &T, b: &T) -> T {
    let mut c = T0;
    for i in 0..64 {
        let zeta = i32::from(ZETA_TABLE_MONT[64 + i]);
        let (c0, c1) =
            base_case_multiply(a.0[4 * i], a.0[4 * i + 1], b.0[4 * i], b.0[4 * i + 1], zeta);
        let (c2, c3) = base_case_multiply(
            a.0[4 * i + 2],
            a.0[4 * i + 3],
            b.0[4 * i + 2],
            b.0[4 * i + 3],
            -zeta,
        );
        c.0[4 * i] = c0;
        c.0[4 * i + 1] = c1;
        c.0[4 * i + 2] = c2;
        c.0[4 * i + 3] = c3;
    }
    c
}


/// NTT-domain inner product of two K-length vectors: accumulate K base
/// multiplications (each bounded by `2q`, so the running sum stays within
/// `i16` for K <= 4), then reduce once.
pub(crate) fn dot_product<const K: usize>(a: &[T; K], b: &[T; K]) -> T {
    let mut w = T0;
    for i in 0..K {
        let c = multiply_ntts(&a[i], &b[i]);
        for n in 0..256 {
            w.0[n] = w.0[n].wrapping_add(c.0[n]);
        }
    }
    for n in &mut w.0 {
        *n = barrett_reduce(*n);
    }
    w
}


#[cfg(test)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use crate::helpers::to_unsigned;
    use crate::types::R0;

    fn normalize(a: i16) -> u16 { to_unsigned(barrett_reduce(a)) }

    #[test]
    fn ntt_inv_ntt_roundtrip() {
        let mut a = R0;
        for (i, c) in a.0.iter_mut().enumerate() {
            *c = (i % 13) as i16;
        }
        let back = inv_ntt(&ntt(&a));
        // the roundtrip output carries one Montgomery factor; strip it
        for n in 0..256 {
            let stripped = normalize(mont_reduce(i32::from(back.0[n])));
            assert_eq!(stripped, a.0[n] as u16, "mismatch at index {n}");
        }
    }

    fn schoolbook_mul(a: &R, b: &R) -> [u16; 256] {
        let q = i64::from(Q);
        let mut c = [0i64; 256];
        for i in 0..256 {
            for j in 0..256 {
                let prod = i64::from(a.0[i]) * i64::from(b.0[j]);
                if i + j < 256 {
                    c[i + j] += prod;
                } else {
                    c[i + j - 256] -= prod; // X^256 = -1
                }
            }
        }
        core::array::from_fn(|n| c[n].rem_euclid(q) as u16)
    }

    #[test]
    fn multiply_ntts_matches_schoolbook() {
        let mut a = R0;
        let mut b = R0;
        for i in 0..256 {
            a.0[i] = ((i * 7 + 3) % 100) as i16;
            b.0[i] = ((i * 13 + 1) % 100) as i16;
        }
        let expected = schoolbook_mul(&a, &b);
        // basemul contributes 2^(-16), inv_ntt contributes 2^16; net is exact
        let c = inv_ntt(&multiply_ntts(&ntt(&a), &ntt(&b)));
        for n in 0..256 {
            assert_eq!(normalize(c.0[n]), expected[n], "mismatch at index {n}");
        }
    }
}
