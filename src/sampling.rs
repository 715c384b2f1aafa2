// Pseudorandom sampling: uniform NTT-domain elements for the public matrix
// (rejection sampling, public data only) and centered-binomial noise for the
// secret/error terms (branch-free bit counting).

use crate::hashing::xof;
use crate::types::{R, R0, T, T0};
use crate::Q;
use sha3::digest::XofReader;


/// Samples an element of `T_q` uniformly from a XOF stream via rejection of
/// 12-bit candidates `>= q`. Only ever driven by the public matrix seed `rho`,
/// so the data-dependent loop count leaks nothing secret.
///
/// **Input**: a squeezable XOF reader seeded with `rho || x || y`. <br>
/// **Output**: an element `a_hat ∈ T_q`.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub(crate) fn sample_ntt(mut reader: impl XofReader) -> T {
    let mut a_hat = T0;
    let mut bbb = [0u8; 3];
    let mut j = 0;
    while j < 256 {
        reader.read(&mut bbb);
        let d1 = u16::from(bbb[0]) | ((u16::from(bbb[1]) & 0x0F) << 8);
        let d2 = (u16::from(bbb[1]) >> 4) | (u16::from(bbb[2]) << 4);
        if d1 < Q as u16 {
            a_hat.0[j] = d1 as i16;
            j += 1;
        }
        if (d2 < Q as u16) && (j < 256) {
            a_hat.0[j] = d2 as i16;
            j += 1;
        }
    }
    a_hat
}


/// Samples a polynomial with coefficients in `[-eta, eta]` from the centered
/// binomial distribution: each coefficient is the difference of two eta-bit
/// population counts. Every bit of `buf` is processed via masked shifts; no
/// early exit and no table lookups indexed by the (secret) input.
///
/// **Input**: `eta ∈ {2, 3}` and a PRF output of `eta * 64` bytes. <br>
/// **Output**: a polynomial `a ∈ R_q` with `|a_n| <= eta`.
///
/// # Panics
/// In debug, requires a correctly sized `buf` and a supported `eta`.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn sample_poly_cbd(eta: usize, buf: &[u8]) -> R {
    debug_assert!((eta == 2) | (eta == 3), "CBD: unsupported eta");
    debug_assert_eq!(buf.len(), eta * 64, "CBD: bad buffer size");
    let mut a = R0;
    if eta == 2 {
        for i in 0..32 {
            let t = u32::from_le_bytes([buf[4 * i], buf[4 * i + 1], buf[4 * i + 2], buf[4 * i + 3]]);
            // pairwise bit-population count of each 2-bit group
            let d = (t & 0x5555_5555) + ((t >> 1) & 0x5555_5555);
            for j in 0..8 {
                let x = ((d >> (4 * j)) & 3) as i16;
                let y = ((d >> (4 * j + 2)) & 3) as i16;
                a.0[8 * i + j] = x - y;
            }
        }
    } else {
        for i in 0..64 {
            let t = u32::from_le_bytes([buf[3 * i], buf[3 * i + 1], buf[3 * i + 2], 0]);
            // bit-population count of each 3-bit group
            let d = (t & 0x0024_9249) + ((t >> 1) & 0x0024_9249) + ((t >> 2) & 0x0024_9249);
            for j in 0..4 {
                let x = ((d >> (6 * j)) & 7) as i16;
                let y = ((d >> (6 * j + 3)) & 7) as i16;
                a.0[4 * i + j] = x - y;
            }
        }
    }
    a
}


/// Expands the K x K public matrix `A_hat` (or its transpose) from the seed
/// `rho`. The transpose swaps the two XOF domain bytes, so encryption's
/// `A^T` expansion is bit-identical to key generation's `A` with the indices
/// exchanged -- both sides must derive the same matrix from `rho` alone.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn expand_a<const K: usize>(rho: &[u8; 32], transposed: bool) -> [[T; K]; K] {
    core::array::from_fn(|i| {
        core::array::from_fn(|j| {
            let (x, y) = if transposed { (i as u8, j as u8) } else { (j as u8, i as u8) };
            sample_ntt(xof(rho, x, y))
        })
    })
}


#[cfg(test)]
#[allow(clippy::cast_possible_truncation)]
mod tests {
    use super::*;

    #[test]
    fn cbd_output_ranges() {
        let buf2 = [0xA5u8; 128];
        for &c in &sample_poly_cbd(2, &buf2).0 {
            assert!((-2..=2).contains(&c), "coefficient {c} out of range for eta=2");
        }
        let buf3 = [0x5Au8; 192];
        for &c in &sample_poly_cbd(3, &buf3).0 {
            assert!((-3..=3).contains(&c), "coefficient {c} out of range for eta=3");
        }
    }

    #[test]
    fn cbd_zero_input() {
        let buf = [0u8; 128];
        assert!(sample_poly_cbd(2, &buf).0.iter().all(|&c| c == 0));
    }

    // recomputes each coefficient bit-by-bit, catching any slip in the
    // packed word/coefficient index arithmetic
    #[test]
    fn cbd_matches_bitwise_definition() {
        let bit = |buf: &[u8], n: usize| i16::from((buf[n / 8] >> (n % 8)) & 1);
        let mut bytes = [0u8; 192];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(73).wrapping_add(11);
        }
        for eta in [2usize, 3] {
            let buf = &bytes[..eta * 64];
            let a = sample_poly_cbd(eta, buf);
            for n in 0..256 {
                let x: i16 = (0..eta).map(|k| bit(buf, 2 * n * eta + k)).sum();
                let y: i16 = (0..eta).map(|k| bit(buf, 2 * n * eta + eta + k)).sum();
                assert_eq!(a.0[n], x - y, "coefficient {n} wrong for eta={eta}");
            }
        }
    }

    #[test]
    fn sample_ntt_in_range() {
        let a_hat = sample_ntt(xof(&[7u8; 32], 1, 2));
        assert!(a_hat.0.iter().all(|&c| (0..Q).contains(&c)));
    }

    #[test]
    fn expand_a_transpose_consistency() {
        let rho = [42u8; 32];
        let a = expand_a::<3>(&rho, false);
        let a_t = expand_a::<3>(&rho, true);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(a[i][j].0, a_t[j][i].0, "A[{i}][{j}] != A^T[{j}][{i}]");
            }
        }
    }
}
