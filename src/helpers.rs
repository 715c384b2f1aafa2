use crate::types::{R, T};
use crate::{Q, ZETA};

/// If the condition is not met, return an error message. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($msg);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


const QI: i32 = Q as i32;

/// `q^(-1) mod 2^16` for the Montgomery reduction; `q * QINV ≡ 1 (mod 2^16)`.
const QINV: i16 = -3327;

/// `2^32 mod q`, used to move a value into the Montgomery domain via `mont_reduce`.
const MONT_R2: i32 = 1353;


/// Montgomery reduction; computes `a * 2^(-16) mod q` for `|a| <= q * 2^15`,
/// returning a centered representative in `(-q, q)`. The 16-bit truncating
/// multiply against `QINV` is part of the numeric contract, not an optimization.
#[allow(clippy::inline_always, clippy::cast_possible_truncation)]
#[inline(always)]
pub(crate) const fn mont_reduce(a: i32) -> i16 {
    let t = (a as i16).wrapping_mul(QINV);
    ((a - (t as i32) * QI) >> 16) as i16
}


/// Barrett reduction; reduces any `i16` into a centered representative in
/// `(-q, q)` using the fixed-point approximation `V ~= 2^26 / q`. Branch-free.
#[allow(clippy::inline_always, clippy::cast_possible_truncation)]
#[inline(always)]
pub(crate) const fn barrett_reduce(a: i16) -> i16 {
    const V: i32 = ((1 << 26) + QI / 2) / QI;
    let t = ((V * (a as i32) + (1 << 25)) >> 26) as i16;
    a.wrapping_sub(t.wrapping_mul(Q))
}


/// Subtract `q` once if the value is `>= q`; for inputs in `[0, 2q)` the result
/// is canonical. The correction uses an arithmetic-shift sign mask so secret
/// coefficients never drive a branch.
#[inline]
pub(crate) const fn cond_sub_q(a: i16) -> i16 {
    let t = a.wrapping_sub(Q);
    t.wrapping_add((t >> 15) & Q)
}


/// Map a centered representative in `(-q, q)` to its canonical value in `[0, q)`
/// by shifting into `(0, 2q)` and applying the branchless correction.
#[allow(clippy::cast_sign_loss)]
#[inline]
pub(crate) const fn to_unsigned(a: i16) -> u16 {
    cond_sub_q(a.wrapping_add(Q)) as u16
}


/// Quotient `⌊n / q⌋` via reciprocal multiplication with `m = ⌈2^36 / q⌉`;
/// exact for all `n < 2^25` (Granlund-Montgomery bound), which covers every
/// compression operand `(x << d) + q/2` with `x < q` and `d <= 12`. Replaces a
/// runtime division that would be variable-time on some targets.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub(crate) const fn div_floor_q(n: u32) -> u32 {
    const M: u64 = (1 << 36) / (QI as u64) + 1;
    ((n as u64 * M) >> 36) as u32
}


/// Coefficient-wise addition with a Barrett pass; inputs centered in `(-q, q)`.
pub(crate) fn add(a: &R, b: &R) -> R {
    R(core::array::from_fn(|n| barrett_reduce(a.0[n].wrapping_add(b.0[n]))))
}


/// Coefficient-wise subtraction `a - b` with a Barrett pass.
pub(crate) fn sub(a: &R, b: &R) -> R {
    R(core::array::from_fn(|n| barrett_reduce(a.0[n].wrapping_sub(b.0[n]))))
}


/// NTT-domain coefficient-wise addition with a Barrett pass.
pub(crate) fn add_hat(a: &T, b: &T) -> T {
    T(core::array::from_fn(|n| barrett_reduce(a.0[n].wrapping_add(b.0[n]))))
}


/// Multiply every NTT-domain coefficient by `2^16 mod q`, moving the element
/// into the Montgomery domain (undoes the implicit `2^(-16)` of a base multiply).
pub(crate) fn to_mont(a: &T) -> T {
    T(core::array::from_fn(|n| mont_reduce(MONT_R2 * i32::from(a.0[n]))))
}


/// HAC Algorithm 14.76 Right-to-left binary exponentiation mod q.
#[allow(clippy::cast_possible_truncation)]
const fn pow_mod_q(g: i16, e: u8) -> i16 {
    let g = g as i64;
    let mut result: i64 = 1;
    let mut s = g;
    let mut e = e;
    while e != 0 {
        if e & 1 != 0 {
            result = (result * s).rem_euclid(QI as i64);
        };
        e >>= 1;
        if e != 0 {
            s = (s * s).rem_euclid(QI as i64);
        };
    }
    result as i16
}


#[allow(clippy::cast_possible_truncation)]
const fn gen_zeta_table_mont() -> [i16; 128] {
    let mut result = [0i16; 128];
    let mut i = 0;
    while i < 128 {
        let brv = (i as u8).reverse_bits() >> 1; // 7-bit reversal
        let zeta = pow_mod_q(ZETA, brv) as i64;
        result[i] = ((zeta << 16).rem_euclid(QI as i64)) as i16;
        i += 1;
    }
    result
}

/// The 128 powers `ζ^brv7(i) * 2^16 mod q` of the primitive 256th root of
/// unity, in bit-reversed order matching the transform's access pattern.
pub(crate) static ZETA_TABLE_MONT: [i16; 128] = gen_zeta_table_mont();
