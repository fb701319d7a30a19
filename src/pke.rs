use crate::codec::{compress, decompress, msg_to_poly, pack, poly_to_msg, unpack};
use crate::matrix::{add_vec, add_vec_ntt, dot, mat_vec_mul, sample_matrix};
use crate::sampling::sample_cbd;
use crate::symmetric::{g, prf};
use crate::types::{Poly, PolyNtt};
use crate::KemError;


/// Encryption-layer key generation from the 32-byte seed `d`.
///
/// Derives `(ρ, σ) = G(d)`, expands Â from ρ, samples the secret and error
/// vectors from CBD(η₁) with consecutive PRF nonces, and writes
/// `ek = t̂ ‖ ρ` and `dk = ŝ` with all ring elements packed at 12 bits.
///
/// # Errors
/// Propagates codec failures; these cannot occur for in-range inputs.
#[allow(clippy::similar_names)]
pub(crate) fn pke_key_gen<const K: usize, const ETA1_64: usize>(
    d: [u8; 32], ek_pke: &mut [u8], dk_pke: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "pke keygen: ek must be 384*K+32 bytes");
    debug_assert_eq!(dk_pke.len(), 384 * K, "pke keygen: dk must be 384*K bytes");

    let (rho, sigma) = g(&[&d]);
    let a_hat = sample_matrix::<K>(&rho, false);

    let mut nonce = 0u8;
    let s: [Poly; K] = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA1_64>(&sigma, nonce));
        nonce += 1;
        p
    });
    let e: [Poly; K] = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA1_64>(&sigma, nonce));
        nonce += 1;
        p
    });

    let s_hat: [PolyNtt; K] = core::array::from_fn(|i| s[i].ntt());
    let e_hat: [PolyNtt; K] = core::array::from_fn(|i| e[i].ntt());
    let t_hat = add_vec_ntt(&mat_vec_mul(&a_hat, &s_hat), &e_hat);

    for (i, chunk) in ek_pke.chunks_mut(384).enumerate().take(K) {
        pack(12, &t_hat[i].0, chunk)?;
    }
    ek_pke[384 * K..].copy_from_slice(&rho);
    for (i, chunk) in dk_pke.chunks_mut(384).enumerate() {
        pack(12, &s_hat[i].0, chunk)?;
    }
    Ok(())
}


/// Encrypts the 32-byte message `m` under `ek_pke` with the explicit
/// randomness seed `r`, writing the compressed ciphertext `u ‖ v` into `ct`.
///
/// The blinding vector y uses CBD(η₁) and nonces 0..K-1; the error vector e₁
/// uses CBD(η₂) and nonces K..2K-1; the error term e₂ uses CBD(η₂) and
/// nonce 2K — all driven by `r`, disjoint from each other.
///
/// # Errors
/// `InvalidParam` when the encapsulation key fails its modulus check.
#[allow(clippy::similar_names, clippy::many_single_char_names)]
pub(crate) fn pke_encrypt<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, ek_pke: &[u8], m: &[u8; 32], r: &[u8; 32], ct: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "pke encrypt: ek must be 384*K+32 bytes");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "pke encrypt: ct must be 32*(du*K+dv) bytes"
    );

    let mut t_hat = [PolyNtt::ZERO; K];
    for (i, chunk) in ek_pke.chunks(384).enumerate().take(K) {
        t_hat[i] = PolyNtt(unpack(12, chunk)?);
    }
    let mut rho = [0u8; 32];
    rho.copy_from_slice(&ek_pke[384 * K..]);

    let a_hat_t = sample_matrix::<K>(&rho, true);

    let mut nonce = 0u8;
    let y: [Poly; K] = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA1_64>(r, nonce));
        nonce += 1;
        p
    });
    let e1: [Poly; K] = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA2_64>(r, nonce));
        nonce += 1;
        p
    });
    let e2 = sample_cbd(&prf::<ETA2_64>(r, nonce));

    let y_hat: [PolyNtt; K] = core::array::from_fn(|i| y[i].ntt());

    let u_hat = mat_vec_mul(&a_hat_t, &y_hat);
    let mut u: [Poly; K] = core::array::from_fn(|i| u_hat[i].inv_ntt());
    u = add_vec(&u, &e1);

    let mu = msg_to_poly(m)?;
    let mut v = dot(&t_hat, &y_hat).inv_ntt().add(&e2).add(&mu);

    let step = 32 * du as usize;
    for (i, chunk) in ct.chunks_mut(step).enumerate().take(K) {
        compress(du, &mut u[i].0);
        pack(du, &u[i].0, chunk)?;
    }
    compress(dv, &mut v.0);
    pack(dv, &v.0, &mut ct[K * step..])?;
    Ok(())
}


/// Decrypts a ciphertext with the packed secret vector ŝ, recovering the
/// 32-byte message: `m = Compress_1(v' - NTT⁻¹(ŝ ⊙ NTT(u')))`.
///
/// # Errors
/// `InvalidParam` when the secret key fails its modulus check. A malformed
/// ciphertext of the correct length never errors here.
#[allow(clippy::similar_names)]
pub(crate) fn pke_decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], KemError> {
    debug_assert_eq!(dk_pke.len(), 384 * K, "pke decrypt: dk must be 384*K bytes");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "pke decrypt: ct must be 32*(du*K+dv) bytes"
    );

    let split = 32 * du as usize * K;
    let (c1, c2) = ct.split_at(split);

    let mut u = [Poly::ZERO; K];
    for (i, chunk) in c1.chunks(32 * du as usize).enumerate() {
        let mut coeffs = unpack(du, chunk)?;
        decompress(du, &mut coeffs);
        u[i] = Poly(coeffs);
    }
    let mut v_coeffs = unpack(dv, c2)?;
    decompress(dv, &mut v_coeffs);
    let v = Poly(v_coeffs);

    let mut s_hat = [PolyNtt::ZERO; K];
    for (i, chunk) in dk_pke.chunks(384).enumerate() {
        s_hat[i] = PolyNtt(unpack(12, chunk)?);
    }

    let u_hat: [PolyNtt; K] = core::array::from_fn(|i| u[i].ntt());
    let w = v.sub(&dot(&s_hat, &u_hat).inv_ntt());
    poly_to_msg(&w)
}


#[cfg(test)]
mod tests {
    use super::{pke_decrypt, pke_encrypt, pke_key_gen};
    use rand_core::{RngCore, SeedableRng};

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const ETA1_64: usize = ETA1 as usize * 64;
    const ETA2_64: usize = ETA2 as usize * 64;
    const EK_LEN: usize = 384 * K + 32;
    const DK_LEN: usize = 384 * K;
    const CT_LEN: usize = 32 * (DU as usize * K + DV as usize);

    #[test]
    fn test_encrypt_decrypt_recovers_message() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(31);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        for _ in 0..10 {
            let mut d = [0u8; 32];
            let mut m = [0u8; 32];
            let mut r = [0u8; 32];
            rng.fill_bytes(&mut d);
            rng.fill_bytes(&mut m);
            rng.fill_bytes(&mut r);

            pke_key_gen::<K, ETA1_64>(d, &mut ek, &mut dk).unwrap();
            let mut ct = [0u8; CT_LEN];
            pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ek, &m, &r, &mut ct).unwrap();
            let recovered = pke_decrypt::<K>(DU, DV, &dk, &ct).unwrap();
            assert_eq!(recovered, m);
        }
    }

    #[test]
    fn test_encrypt_rejects_out_of_range_key() {
        // all-ones 12-bit coefficients decode to 4095 >= q
        let bad_ek = [0xFFu8; EK_LEN];
        let m = [0u8; 32];
        let r = [0u8; 32];
        let mut ct = [0u8; CT_LEN];
        let res = pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &bad_ek, &m, &r, &mut ct);
        assert!(res.is_err());
    }

    #[test]
    fn test_keygen_is_deterministic() {
        let d = [0x33u8; 32];
        let (mut ek1, mut dk1) = ([0u8; EK_LEN], [0u8; DK_LEN]);
        let (mut ek2, mut dk2) = ([0u8; EK_LEN], [0u8; DK_LEN]);
        pke_key_gen::<K, ETA1_64>(d, &mut ek1, &mut dk1).unwrap();
        pke_key_gen::<K, ETA1_64>(d, &mut ek2, &mut dk2).unwrap();
        assert_eq!(ek1, ek2);
        assert_eq!(dk1, dk2);
    }
}
