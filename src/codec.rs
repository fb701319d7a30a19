use crate::types::{Poly, Z};
use crate::{KemError, Q};


/// Packs 256 d-bit coefficients little-endian into `32·d` bytes, for
/// 1 ≤ d ≤ 12. Coefficients are masked to their low d bits, which also
/// realizes the `mod 2^d` of compression at d = 10 and 11.
///
/// # Errors
/// `InvalidParam` when d lies outside the supported range.
#[allow(clippy::cast_possible_truncation)] // acc as u8; low byte only
pub(crate) fn pack(d: u32, coeffs: &[Z; 256], out: &mut [u8]) -> Result<(), KemError> {
    ensure!((1..=12).contains(&d), KemError::InvalidParam);
    debug_assert_eq!(out.len(), 32 * d as usize, "pack output must be 32*d bytes");
    let mask = (1u64 << d) - 1;
    let mut acc = 0u64;
    let mut acc_bits = 0usize;
    let mut bytes = out.iter_mut();
    for coeff in coeffs {
        acc |= (u64::from(coeff.get_u16()) & mask) << acc_bits;
        acc_bits += d as usize;
        while acc_bits >= 8 {
            if let Some(b) = bytes.next() {
                *b = acc as u8;
            }
            acc >>= 8;
            acc_bits -= 8;
        }
    }
    Ok(())
}


/// Unpacks `32·d` bytes into 256 d-bit coefficients. At d = 12 every value
/// must decode below q; this is the modulus check applied to serialized
/// encapsulation and decapsulation keys.
///
/// # Errors
/// `InvalidParam` when d lies outside the supported range or a 12-bit
/// coefficient fails the modulus check.
#[allow(clippy::cast_possible_truncation)] // masked to at most 12 bits
pub(crate) fn unpack(d: u32, bytes: &[u8]) -> Result<[Z; 256], KemError> {
    ensure!((1..=12).contains(&d), KemError::InvalidParam);
    debug_assert_eq!(bytes.len(), 32 * d as usize, "unpack input must be 32*d bytes");
    let mask = (1u64 << d) - 1;
    let mut coeffs = [Z::default(); 256];
    let mut index = 0usize;
    let (mut acc, mut acc_bits) = (0u64, 0usize);
    for byte in bytes {
        acc |= u64::from(*byte) << acc_bits;
        acc_bits += 8;
        while (acc_bits >= d as usize) & (index < 256) {
            coeffs[index].set_u16((acc & mask) as u16);
            acc >>= d;
            acc_bits -= d as usize;
            index += 1;
        }
    }
    if d == 12 {
        ensure!(coeffs.iter().all(|c| c.get_u32() < Q), KemError::InvalidParam);
    }
    Ok(coeffs)
}


/// `Compress_d(x) = ⌊(2^d / q) · x⌉ mod 2^d`, computed with the same
/// multiply-shift constant as `Z::mul` so no division appears. The final
/// `mod 2^d` is deferred to the mask in `pack`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn compress(d: u32, coeffs: &mut [Z; 256]) {
    const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;
    for c in coeffs.iter_mut() {
        let y = (c.get_u32() << d) + (Q >> 1);
        let quot = ((u64::from(y) * M) >> 36) as u32;
        c.set_u16(quot as u16);
    }
}


/// `Decompress_d(y) = ⌊(q / 2^d) · y⌉`, computed as `(q·y + 2^{d-1}) >> d`.
/// Lossy inverse of `compress`: the result is within `⌈q/2^{d+1}⌉` of the
/// original, never equal in general.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn decompress(d: u32, coeffs: &mut [Z; 256]) {
    for c in coeffs.iter_mut() {
        let qy = Q * c.get_u32() + (1 << (d - 1));
        c.set_u16((qy >> d) as u16);
    }
}


/// Expands a 32-byte message into a ring element whose coefficients are
/// 0 or ⌈q/2⌋ = 1665: bit `8i + j` of the message drives coefficient
/// `8i + j`, via `Decompress_1`.
///
/// # Errors
/// Propagates `unpack` failures (unreachable for d = 1 on a 32-byte input).
pub(crate) fn msg_to_poly(m: &[u8; 32]) -> Result<Poly, KemError> {
    let mut coeffs = unpack(1, m)?;
    decompress(1, &mut coeffs);
    Ok(Poly(coeffs))
}


/// Collapses a ring element to 32 bytes, one bit per coefficient via
/// `Compress_1`: the bit is set iff the coefficient is closer to ⌈q/2⌋
/// than to 0 (distance taken with wraparound).
///
/// # Errors
/// Propagates `pack` failures (unreachable for d = 1).
pub(crate) fn poly_to_msg(w: &Poly) -> Result<[u8; 32], KemError> {
    let mut coeffs = w.0;
    compress(1, &mut coeffs);
    let mut m = [0u8; 32];
    pack(1, &coeffs, &mut m)?;
    Ok(m)
}


#[cfg(test)]
mod tests {
    use super::{compress, decompress, msg_to_poly, pack, poly_to_msg, unpack};
    use crate::types::Z;
    use crate::{KemError, Q};
    use rand::{Rng, SeedableRng};
    use rand_core::RngCore;

    #[test]
    fn test_unpack_then_pack_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(21);
        for d in [1u32, 4, 5, 10, 11] {
            let len = 32 * d as usize;
            let mut bytes = [0u8; 32 * 11];
            rng.fill_bytes(&mut bytes[..len]);
            let coeffs = unpack(d, &bytes[..len]).unwrap();
            let mut back = [0u8; 32 * 11];
            pack(d, &coeffs, &mut back[..len]).unwrap();
            assert_eq!(bytes[..len], back[..len]);
        }
    }

    #[test]
    fn test_pack_then_unpack_at_12() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(22);
        let coeffs: [Z; 256] =
            core::array::from_fn(|_| Z(u16::try_from(rng.gen_range(0..Q)).unwrap()));
        let mut bytes = [0u8; 384];
        pack(12, &coeffs, &mut bytes).unwrap();
        let back = unpack(12, &bytes).unwrap();
        for i in 0..256 {
            assert_eq!(back[i].get_u16(), coeffs[i].get_u16());
        }
    }

    #[test]
    fn test_unpack_12_rejects_oversized_coefficients() {
        // all-ones packing decodes to 4095 >= q
        let bytes = [0xFFu8; 384];
        assert_eq!(unpack(12, &bytes).unwrap_err(), KemError::InvalidParam);
    }

    #[test]
    fn test_unsupported_width_rejected() {
        assert_eq!(unpack(0, &[]).unwrap_err(), KemError::InvalidParam);
        assert_eq!(pack(13, &[Z::default(); 256], &mut []).unwrap_err(), KemError::InvalidParam);
    }

    #[test]
    fn test_compression_error_bound() {
        // |Decompress_d(Compress_d(x)) - x| <= ceil(q / 2^{d+1}), centered mod q
        for d in [1u32, 4, 5, 10, 11] {
            let bound = (Q + (1 << (d + 1)) - 1) / (1 << (d + 1));
            for x in 0..Q {
                let mut c = [Z::default(); 256];
                c[0].set_u16(u16::try_from(x).unwrap());
                compress(d, &mut c);
                c[0].set_u16(c[0].get_u16() & ((1 << d) - 1));
                decompress(d, &mut c);
                let y = c[0].get_u32();
                let diff = (Q + y - x) % Q;
                let centered = diff.min(Q - diff);
                assert!(centered <= bound, "d={d} x={x} y={y} err={centered}");
            }
        }
    }

    #[test]
    fn test_message_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(23);
        for _ in 0..100 {
            let mut m = [0u8; 32];
            rng.fill_bytes(&mut m);
            let p = msg_to_poly(&m).unwrap();
            for c in &p.0 {
                assert!((c.get_u16() == 0) | (c.get_u16() == 1665));
            }
            assert_eq!(poly_to_msg(&p).unwrap(), m);
        }
    }
}
