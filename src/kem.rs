use crate::pke::{pke_decrypt, pke_encrypt, pke_key_gen};
use crate::symmetric::{g, h, kdf};
use crate::{KemError, SharedSecret};
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};


/// KEM key generation from the two 32-byte seeds: `d` drives the
/// encryption-layer keypair, `z` is the implicit-rejection secret. The
/// decapsulation key is laid out as `ŝ ‖ ek ‖ H(ek) ‖ z`.
///
/// # Errors
/// Propagates encryption-layer failures; these cannot occur for in-range
/// inputs.
pub(crate) fn kem_key_gen_from_seed<const K: usize, const ETA1_64: usize>(
    d: [u8; 32], z: [u8; 32], ek: &mut [u8], dk: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "kem keygen: ek must be 384*K+32 bytes");
    debug_assert_eq!(dk.len(), 768 * K + 96, "kem keygen: dk must be 768*K+96 bytes");

    let p1 = 384 * K;
    pke_key_gen::<K, ETA1_64>(d, ek, &mut dk[..p1])?;

    let h_ek = h(ek);
    let p2 = p1 + ek.len();
    let p3 = p2 + h_ek.len();
    dk[p1..p2].copy_from_slice(ek);
    dk[p2..p3].copy_from_slice(&h_ek);
    dk[p3..].copy_from_slice(&z);
    Ok(())
}


/// KEM key generation with fresh randomness: draws the seeds `d` and `z`
/// from the given generator, then defers to the seeded variant.
///
/// # Errors
/// `EntropyFailure` when the generator declines to produce bytes.
pub(crate) fn kem_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, ek: &mut [u8], dk: &mut [u8],
) -> Result<(), KemError> {
    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| KemError::EntropyFailure)?;
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z).map_err(|_| KemError::EntropyFailure)?;
    kem_key_gen_from_seed::<K, ETA1_64>(d, z, ek, dk)
}


/// Deterministic encapsulation core. The caller-provided `m` is first
/// hashed (hedging against a weak entropy source), then
/// `(K̄, r) = G(m ‖ H(ek))`, the message is encrypted under `r`, and the
/// shared secret is `KDF(K̄ ‖ H(c))`.
fn kem_encaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, m: &[u8; 32], ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecret, KemError> {
    let m_hashed = h(m);
    let h_ek = h(ek);
    let (k_bar, r) = g(&[&m_hashed, &h_ek]);
    pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek, &m_hashed, &r, ct)?;
    let ssk = kdf(&[&k_bar, &h(ct)]);
    Ok(SharedSecret(ssk))
}


/// Encapsulation: draws the 32-byte message seed from the generator and
/// runs the deterministic core, returning the shared secret with the
/// ciphertext written into `ct`.
///
/// # Errors
/// `EntropyFailure` when the generator declines to produce bytes;
/// `InvalidParam` when the encapsulation key fails its modulus check.
pub(crate) fn kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecret, KemError> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "kem encaps: ek must be 384*K+32 bytes");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "kem encaps: ct must be 32*(du*K+dv) bytes"
    );

    let mut m = [0u8; 32];
    rng.try_fill_bytes(&mut m).map_err(|_| KemError::EntropyFailure)?;
    kem_encaps_internal::<K, ETA1_64, ETA2_64>(du, dv, &m, ek, ct)
}


/// Decapsulation with implicit rejection: decrypt, re-derive `(K̄′, r′)`,
/// re-encrypt, and select between `KDF(K̄′ ‖ H(c))` and `KDF(z ‖ H(c))` on
/// the outcome of a constant-time comparison of `c` with `c′`. Both KDF
/// inputs are hashed unconditionally, so a mismatching ciphertext is
/// indistinguishable from a matching one to a timing adversary.
///
/// # Errors
/// `InvalidParam` when the decapsulation key fails its modulus check. A
/// malformed ciphertext of the correct length is never an error: it yields
/// a pseudorandom shared secret.
#[allow(clippy::similar_names)]
pub(crate) fn kem_decaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize, const CT_LEN: usize>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecret, KemError> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "kem decaps: dk must be 768*K+96 bytes");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "kem decaps: ct must be 32*(du*K+dv) bytes"
    );

    let dk_pke = &dk[0..384 * K];
    let ek_pke = &dk[384 * K..768 * K + 32];
    let h_ek = &dk[768 * K + 32..768 * K + 64];
    let z = &dk[768 * K + 64..768 * K + 96];

    let m_prime = pke_decrypt::<K>(du, dv, dk_pke, ct)?;
    let (k_bar_prime, r_prime) = g(&[&m_prime, h_ek]);

    let mut ct_prime = [0u8; CT_LEN];
    pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek_pke, &m_prime, &r_prime, &mut ct_prime)?;

    let h_ct = h(ct);
    let mut ssk = kdf(&[&k_bar_prime, &h_ct]);
    let reject = kdf(&[z, &h_ct]);
    ssk.conditional_assign(&reject, ct.ct_ne(&ct_prime));
    Ok(SharedSecret(ssk))
}
