// Conversion between ring elements and byte strings: the lossless 12-bit key
// codec, the lossy d-bit ciphertext codec, and the 1-bit message codec.

use crate::helpers::{div_floor_q, ensure, to_unsigned};
use crate::types::{R, R0, T, T0};
use crate::Q;


/// Lossless encode: packs 256 canonical coefficients at 12 bits each into 384
/// bytes (two coefficients per three bytes). Used for the key vectors.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn byte_encode(p: &T, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), 384, "ByteEncode: incorrect output size");
    for i in 0..128 {
        let c0 = to_unsigned(p.0[2 * i]);
        let c1 = to_unsigned(p.0[2 * i + 1]);
        bytes[3 * i] = c0 as u8;
        bytes[3 * i + 1] = ((c0 >> 8) | (c1 << 4)) as u8;
        bytes[3 * i + 2] = (c1 >> 4) as u8;
    }
}


/// Lossless decode: unpacks 384 bytes into 256 coefficients, rejecting any
/// 12-bit field `>= q`. Because canonical values encode uniquely, this range
/// check is exactly the decode-then-re-encode "modulus check" demanded of
/// deserialized public keys.
///
/// # Errors
/// Returns an error on any non-canonical (out of range) coefficient.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub(crate) fn byte_decode(bytes: &[u8]) -> Result<T, &'static str> {
    debug_assert_eq!(bytes.len(), 384, "ByteDecode: incorrect input size");
    let mut p = T0;
    for i in 0..128 {
        let b0 = u16::from(bytes[3 * i]);
        let b1 = u16::from(bytes[3 * i + 1]);
        let b2 = u16::from(bytes[3 * i + 2]);
        let c0 = b0 | ((b1 & 0x0F) << 8);
        let c1 = (b1 >> 4) | (b2 << 4);
        ensure!((c0 < Q as u16) & (c1 < Q as u16), "ByteDecode: coefficient out of range");
        p.0[2 * i] = c0 as i16;
        p.0[2 * i + 1] = c1 as i16;
    }
    Ok(p)
}


/// `Compress_d(x) = round(x * 2^d / q) mod 2^d` on one canonical coefficient;
/// the divide-by-q runs through the exact reciprocal multiply in
/// [`div_floor_q`], never a runtime division against secret data.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[inline]
pub(crate) fn compress_coeff(x: u16, d: u32) -> u16 {
    (div_floor_q((u32::from(x) << d) + u32::from(Q as u16) / 2) & ((1 << d) - 1)) as u16
}


/// `Decompress_d(y) = round(y * q / 2^d)`; division by a power of two only.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
#[inline]
pub(crate) fn decompress_coeff(y: u16, d: u32) -> i16 {
    ((u32::from(y) * u32::from(Q as u16) + (1 << (d - 1))) >> d) as i16
}


/// Lossy encode: quantizes each coefficient to `d` bits (`d ∈ {4, 5, 10, 11}`)
/// and bit-packs the results into `32 * d` bytes. Used for the ciphertext.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn compress_poly(p: &R, d: u32, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "Compress: incorrect output size");
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    let mut idx = 0;
    for &c in &p.0 {
        acc |= u32::from(compress_coeff(to_unsigned(c), d)) << acc_bits;
        acc_bits += d;
        while acc_bits >= 8 {
            bytes[idx] = acc as u8;
            idx += 1;
            acc >>= 8;
            acc_bits -= 8;
        }
    }
}


/// Lossy decode: unpacks `d`-bit fields and scales each back to `[0, q)`.
/// Total over any correctly sized input; tampered bytes still decode.
pub(crate) fn decompress_poly(bytes: &[u8], d: u32) -> R {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "Decompress: incorrect input size");
    let mut p = R0;
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    let mut idx = 0;
    for c in &mut p.0 {
        while acc_bits < d {
            acc |= u32::from(bytes[idx]) << acc_bits;
            idx += 1;
            acc_bits += 8;
        }
        *c = decompress_coeff((acc & ((1 << d) - 1)) as u16, d);
        acc >>= d;
        acc_bits -= d;
    }
    p
}


/// Maps a 256-bit message to a polynomial with coefficients 0 or `(q+1)/2`
/// via a sign-mask select (`Decompress_1` of each bit); no branch on the bit.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn encode_message(m: &[u8; 32]) -> R {
    let mut p = R0;
    for (i, &byte) in m.iter().enumerate() {
        for j in 0..8 {
            let mask = ((i16::from(byte >> j) & 1) << 15) >> 15;
            p.0[8 * i + j] = mask & ((Q + 1) / 2);
        }
    }
    p
}


/// Recovers the 256-bit message: each coefficient rounds to whichever of 0 and
/// `q/2` it is closer to (`Compress_1`), through the same masked reciprocal
/// arithmetic as the wide codec -- no comparison branch on secret data.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn decode_message(p: &R) -> [u8; 32] {
    let mut m = [0u8; 32];
    for i in 0..32 {
        for j in 0..8 {
            let bit = compress_coeff(to_unsigned(p.0[8 * i + j]), 1);
            m[i] |= (bit as u8) << j;
        }
    }
    m
}
