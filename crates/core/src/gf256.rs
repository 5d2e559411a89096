//! GF(2^8) arithmetic and byte-polynomial helpers.
//!
//! The field is built from the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//! (0x11d) with generator α = 2, the conventional choice for byte-oriented
//! Reed-Solomon codes.
//!
//! # Polynomial Representation
//!
//! Polynomials are byte slices ordered highest degree first:
//!
//! ```text
//! [a, b, c]  <=>  a·x^2 + b·x + c
//! ```
//!
//! This matches the order in which codeword bytes are transmitted, so a
//! codeword can be evaluated directly as a polynomial.
//!
//! # Tables
//!
//! `EXP` holds 512 entries (two copies of the 255-cycle) so that the sum of
//! two logarithms can index it without a modulo.

/// Primitive polynomial for the field.
const PRIMITIVE: u16 = 0x11d;

/// Multiplicative group order.
pub const FIELD_ORDER: usize = 255;

static EXP: [u8; 512] = exp_table();
static LOG: [u8; 256] = log_table();

const fn exp_table() -> [u8; 512] {
    let mut exp = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < FIELD_ORDER {
        exp[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    while i < 512 {
        exp[i] = exp[i - FIELD_ORDER];
        i += 1;
    }
    exp
}

const fn log_table() -> [u8; 256] {
    let exp = exp_table();
    let mut log = [0u8; 256];
    let mut i = 0;
    while i < FIELD_ORDER {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    log
}

/// Multiply two field elements.
#[inline]
pub fn mul(x: u8, y: u8) -> u8 {
    if x == 0 || y == 0 {
        0
    } else {
        EXP[LOG[x as usize] as usize + LOG[y as usize] as usize]
    }
}

/// Divide `x` by `y`. `y` must be non-zero.
#[inline]
pub fn div(x: u8, y: u8) -> u8 {
    debug_assert!(y != 0, "division by zero in GF(256)");
    if x == 0 {
        return 0;
    }
    EXP[(LOG[x as usize] as usize + FIELD_ORDER - LOG[y as usize] as usize) % FIELD_ORDER]
}

/// Multiplicative inverse. `x` must be non-zero.
#[inline]
pub fn inverse(x: u8) -> u8 {
    debug_assert!(x != 0, "zero has no inverse in GF(256)");
    EXP[FIELD_ORDER - LOG[x as usize] as usize]
}

/// α^power.
#[inline]
pub fn alpha_pow(power: usize) -> u8 {
    EXP[power % FIELD_ORDER]
}

/// Multiply every coefficient by `x`.
pub fn poly_scale(p: &[u8], x: u8) -> Vec<u8> {
    p.iter().map(|&c| mul(c, x)).collect()
}

/// Add (XOR) two polynomials, aligning their constant terms.
pub fn poly_add(p: &[u8], q: &[u8]) -> Vec<u8> {
    let len = p.len().max(q.len());
    let mut result = vec![0u8; len];
    for (i, &v) in p.iter().enumerate() {
        result[i + len - p.len()] = v;
    }
    for (i, &v) in q.iter().enumerate() {
        result[i + len - q.len()] ^= v;
    }
    result
}

/// Multiply two polynomials.
pub fn poly_mul(p: &[u8], q: &[u8]) -> Vec<u8> {
    if p.is_empty() || q.is_empty() {
        return Vec::new();
    }
    let mut result = vec![0u8; p.len() + q.len() - 1];
    for (j, &qv) in q.iter().enumerate() {
        for (i, &pv) in p.iter().enumerate() {
            result[i + j] ^= mul(pv, qv);
        }
    }
    result
}

/// Evaluate a polynomial at `x` (Horner's rule).
pub fn poly_eval(p: &[u8], x: u8) -> u8 {
    p.iter().fold(0u8, |acc, &c| mul(acc, x) ^ c)
}

/// Remainder of synthetic division by a monic divisor.
///
/// The divisor's leading coefficient is assumed to be 1.
pub fn poly_rem(dividend: &[u8], divisor: &[u8]) -> Vec<u8> {
    let rem_len = divisor.len().saturating_sub(1);
    if dividend.len() < divisor.len() {
        let mut padded = vec![0u8; rem_len.saturating_sub(dividend.len())];
        padded.extend_from_slice(dividend);
        return padded;
    }

    let mut out = dividend.to_vec();
    for i in 0..(dividend.len() - rem_len) {
        let coef = out[i];
        if coef != 0 {
            for (j, &d) in divisor.iter().enumerate().skip(1) {
                if d != 0 {
                    out[i + j] ^= mul(d, coef);
                }
            }
        }
    }
    out.split_off(dividend.len() - rem_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cycle() {
        assert_eq!(EXP[0], 1);
        assert_eq!(EXP[8], 0x1d);
        assert_eq!(EXP[255], 1);
        for x in 1..=255u8 {
            assert_eq!(EXP[LOG[x as usize] as usize], x);
        }
    }

    #[test]
    fn test_mul_basic() {
        assert_eq!(mul(0, 5), 0);
        assert_eq!(mul(5, 0), 0);
        assert_eq!(mul(1, 77), 77);
        assert_eq!(mul(2, 2), 4);
        assert_eq!(mul(0x80, 2), 0x1d);
    }

    #[test]
    fn test_div_and_inverse() {
        for x in 1..=255u8 {
            assert_eq!(div(x, x), 1);
            assert_eq!(mul(x, inverse(x)), 1);
            assert_eq!(div(mul(x, 7), 7), x);
        }
        assert_eq!(div(0, 9), 0);
    }

    #[test]
    fn test_alpha_pow_wraps() {
        assert_eq!(alpha_pow(0), 1);
        assert_eq!(alpha_pow(1), 2);
        assert_eq!(alpha_pow(255), 1);
        assert_eq!(alpha_pow(256), 2);
    }

    #[test]
    fn test_poly_add_aligns_constant_terms() {
        assert_eq!(poly_add(&[1], &[3, 0]), vec![3, 1]);
        assert_eq!(poly_add(&[1, 2, 3], &[1, 2, 3]), vec![0, 0, 0]);
    }

    #[test]
    fn test_poly_mul_and_eval() {
        // (x + 1)(x + 2) = x^2 + 3x + 2
        let p = poly_mul(&[1, 1], &[1, 2]);
        assert_eq!(p, vec![1, 3, 2]);
        assert_eq!(poly_eval(&p, 1), 0);
        assert_eq!(poly_eval(&p, 2), 0);
        assert_ne!(poly_eval(&p, 3), 0);
    }

    #[test]
    fn test_poly_rem() {
        // x^2 + 3x + 2 = (x + 1)(x + 2), so dividing by x + 1 leaves nothing
        assert_eq!(poly_rem(&[1, 3, 2], &[1, 1]), vec![0]);
        // x^2 mod (x^2 + 1) = 1
        assert_eq!(poly_rem(&[1, 0, 0], &[1, 0, 1]), vec![0, 1]);
        // Short dividends are returned zero-padded
        assert_eq!(poly_rem(&[5], &[1, 0, 0]), vec![0, 5]);
    }
}
