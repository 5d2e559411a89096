//! Systematic Reed-Solomon codec over GF(2^8).
//!
//! # Code Construction
//!
//! - Generator: g(x) = (x - α^0)(x - α^1)...(x - α^(nsym-1))
//! - Encoding: message bytes first, followed by the remainder of
//!   message(x)·x^nsym divided by g(x)
//! - Maximum block length: 255 bytes (one byte per symbol)
//!
//! # Decoding Pipeline
//!
//! ```text
//! syndromes -> Forney syndromes (erasures removed) -> Berlekamp-Massey
//!   -> Chien search -> Forney magnitudes -> syndrome re-check
//! ```
//!
//! Each unknown error costs two parity symbols; each declared erasure costs
//! one. A block is correctable when `2·errors + erasures <= nsym`.

use crate::codec::{Codec, DecodedBlock};
use crate::error::{ParameterError, Result, UncorrectableError};
use crate::gf256;

/// Largest block a byte-symbol code can address.
pub const MAX_BLOCK_LEN: usize = gf256::FIELD_ORDER;

/// Stateless Reed-Solomon codec.
///
/// The generator polynomial is rebuilt per call, so one instance serves any
/// `nsym` and can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedSolomon;

impl ReedSolomon {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for ReedSolomon {
    fn max_block_len(&self) -> usize {
        MAX_BLOCK_LEN
    }

    fn encode(&self, message: &[u8], nsym: usize) -> Result<Vec<u8>> {
        let len = message.len() + nsym;
        if len > MAX_BLOCK_LEN {
            return Err(ParameterError::BlockTooLong {
                len,
                max: MAX_BLOCK_LEN,
            }
            .into());
        }

        Ok(encode_block(message, nsym))
    }

    fn decode(
        &self,
        codeword: &[u8],
        nsym: usize,
        erasures: Option<&[usize]>,
    ) -> Result<DecodedBlock> {
        let n = codeword.len();
        if n > MAX_BLOCK_LEN {
            return Err(ParameterError::BlockTooLong {
                len: n,
                max: MAX_BLOCK_LEN,
            }
            .into());
        }
        if n < nsym {
            return Err(ParameterError::CodewordTooShort { len: n, nsym }.into());
        }

        let mut erasures = erasures.map(<[usize]>::to_vec).unwrap_or_default();
        erasures.sort_unstable();
        erasures.dedup();
        if let Some(&position) = erasures.iter().find(|&&p| p >= n) {
            return Err(ParameterError::ErasureOutOfRange { position, len: n }.into());
        }

        let mut block = codeword.to_vec();
        for &p in &erasures {
            block[p] = 0;
        }

        if erasures.len() > nsym {
            return Err(UncorrectableError::TooManyErasures {
                erasures: erasures.len(),
                nsym,
            }
            .into());
        }

        let synd = syndromes(&block, nsym);
        if synd.iter().all(|&s| s == 0) {
            return Ok(split_block(block, nsym, erasures));
        }

        let fsynd = forney_syndromes(&synd, &erasures, n);
        let locator = error_locator(&fsynd, nsym, erasures.len())?;
        let errors = find_errors(&locator, n)?;

        let mut positions = erasures;
        positions.extend(errors);
        if positions.is_empty() {
            return Err(UncorrectableError::DegenerateLocator.into());
        }

        let corrected = correct_errata(&block, &synd, &positions)?;
        if syndromes(&corrected, nsym).iter().any(|&s| s != 0) {
            return Err(UncorrectableError::ResidualSyndrome.into());
        }

        positions.sort_unstable();
        Ok(split_block(corrected, nsym, positions))
    }
}

fn split_block(codeword: Vec<u8>, nsym: usize, corrected_positions: Vec<usize>) -> DecodedBlock {
    let message = codeword[..codeword.len() - nsym].to_vec();
    DecodedBlock {
        message,
        codeword,
        corrected_positions,
    }
}

/// Build g(x) = Π (x - α^i) for i in 0..nsym.
pub fn generator_poly(nsym: usize) -> Vec<u8> {
    (0..nsym).fold(vec![1u8], |g, i| gf256::poly_mul(&g, &[1, gf256::alpha_pow(i)]))
}

/// Systematic encode: message followed by nsym parity bytes.
fn encode_block(message: &[u8], nsym: usize) -> Vec<u8> {
    let generator = generator_poly(nsym);

    let mut out = vec![0u8; message.len() + nsym];
    out[..message.len()].copy_from_slice(message);

    // Synthetic division by the monic generator; the tail holds the remainder
    for i in 0..message.len() {
        let coef = out[i];
        if coef != 0 {
            for (j, &g) in generator.iter().enumerate().skip(1) {
                out[i + j] ^= gf256::mul(g, coef);
            }
        }
    }

    out[..message.len()].copy_from_slice(message);
    out
}

/// S_i = r(α^i) for i in 0..nsym. All zero iff `block` is a codeword.
fn syndromes(block: &[u8], nsym: usize) -> Vec<u8> {
    (0..nsym)
        .map(|i| gf256::poly_eval(block, gf256::alpha_pow(i)))
        .collect()
}

/// Fold the known erasure locations out of the syndromes so that
/// Berlekamp-Massey only has to find the unknown errors.
fn forney_syndromes(synd: &[u8], erasures: &[usize], n: usize) -> Vec<u8> {
    let mut fsynd = synd.to_vec();
    for &p in erasures {
        let x = gf256::alpha_pow(n - 1 - p);
        for j in 0..fsynd.len().saturating_sub(1) {
            fsynd[j] = gf256::mul(fsynd[j], x) ^ fsynd[j + 1];
        }
    }
    fsynd
}

/// Berlekamp-Massey over the Forney syndromes.
///
/// Returns the error locator, highest degree first, with constant term 1.
fn error_locator(fsynd: &[u8], nsym: usize, erase_count: usize) -> Result<Vec<u8>> {
    let mut err_loc = vec![1u8];
    let mut old_loc = vec![1u8];

    for k in 0..(nsym - erase_count) {
        let mut delta = fsynd[k];
        for j in 1..err_loc.len() {
            delta ^= gf256::mul(err_loc[err_loc.len() - 1 - j], fsynd[k - j]);
        }

        old_loc.push(0);

        if delta != 0 {
            if old_loc.len() > err_loc.len() {
                let new_loc = gf256::poly_scale(&old_loc, delta);
                old_loc = gf256::poly_scale(&err_loc, gf256::inverse(delta));
                err_loc = new_loc;
            }
            err_loc = gf256::poly_add(&err_loc, &gf256::poly_scale(&old_loc, delta));
        }
    }

    let leading = err_loc.iter().take_while(|&&c| c == 0).count();
    let err_loc = err_loc.split_off(leading);

    let errors = err_loc.len().saturating_sub(1);
    if errors * 2 + erase_count > nsym {
        return Err(UncorrectableError::TooManyErrors {
            errors,
            erasures: erase_count,
            nsym,
        }
        .into());
    }

    Ok(err_loc)
}

/// Chien search: byte positions whose locator root is present.
fn find_errors(locator: &[u8], n: usize) -> Result<Vec<usize>> {
    let expected = locator.len().saturating_sub(1);
    let reversed: Vec<u8> = locator.iter().rev().copied().collect();

    let positions: Vec<usize> = (0..n)
        .filter(|&i| gf256::poly_eval(&reversed, gf256::alpha_pow(i)) == 0)
        .map(|i| n - 1 - i)
        .collect();

    if positions.len() != expected {
        return Err(UncorrectableError::LocatorMismatch {
            expected,
            found: positions.len(),
        }
        .into());
    }

    Ok(positions)
}

/// Forney algorithm: compute error magnitudes at `positions` and apply them.
fn correct_errata(block: &[u8], synd: &[u8], positions: &[usize]) -> Result<Vec<u8>> {
    let n = block.len();
    let coef_pos: Vec<usize> = positions.iter().map(|&p| n - 1 - p).collect();

    // Λ(x) = Π (1 + X_i·x)
    let errata_loc = coef_pos.iter().fold(vec![1u8], |loc, &c| {
        gf256::poly_mul(&loc, &gf256::poly_add(&[1], &[gf256::alpha_pow(c), 0]))
    });

    // Ω(x) = S(x)·Λ(x) mod x^(deg Λ + 1), with S carrying a leading zero term
    let mut rsynd: Vec<u8> = synd.iter().rev().copied().collect();
    rsynd.push(0);
    let mut divisor = vec![0u8; errata_loc.len() + 1];
    divisor[0] = 1;
    let evaluator = gf256::poly_rem(&gf256::poly_mul(&rsynd, &errata_loc), &divisor);

    let x: Vec<u8> = coef_pos.iter().map(|&c| gf256::alpha_pow(c)).collect();

    let mut magnitudes = vec![0u8; n];
    for (i, &xi) in x.iter().enumerate() {
        let xi_inv = gf256::inverse(xi);

        let loc_prime = x
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .fold(1u8, |acc, (_, &xj)| gf256::mul(acc, 1 ^ gf256::mul(xi_inv, xj)));
        if loc_prime == 0 {
            return Err(UncorrectableError::DegenerateLocator.into());
        }

        let y = gf256::mul(xi, gf256::poly_eval(&evaluator, xi_inv));
        magnitudes[positions[i]] = gf256::div(y, loc_prime);
    }

    Ok(block
        .iter()
        .zip(&magnitudes)
        .map(|(&b, &e)| b ^ e)
        .collect())
}
