use core::num::NonZeroU32;
use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use kyber_kem::{kyber512, KemError, SharedSecret};
use rand_core::{CryptoRng, RngCore, SeedableRng};


// A random source that always declines to produce bytes.
struct FailRng;

impl RngCore for FailRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!()
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!()
    }

    fn fill_bytes(&mut self, _out: &mut [u8]) {
        unimplemented!()
    }

    fn try_fill_bytes(&mut self, _out: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::from(
            NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap(),
        ))
    }
}

impl CryptoRng for FailRng {}


// Garbage bytes of the right length: keys fail their modulus check, while
// ciphertexts parse and decapsulate to a pseudorandom secret.
#[test]
fn test_garbage_inputs_512() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    let (_ek, dk) = kyber512::KG::try_keygen_with_rng(&mut rng).unwrap();

    for _ in 0..100 {
        let mut bad_ek_bytes = [0u8; kyber512::EK_LEN];
        rng.fill_bytes(&mut bad_ek_bytes);
        let bad_ek = kyber512::EncapsKey::try_from_bytes(&bad_ek_bytes);
        assert_eq!(bad_ek.unwrap_err(), KemError::InvalidParam);

        let mut bad_dk_bytes = [0u8; kyber512::DK_LEN];
        rng.fill_bytes(&mut bad_dk_bytes);
        let bad_dk = kyber512::DecapsKey::try_from_bytes(&bad_dk_bytes);
        assert_eq!(bad_dk.unwrap_err(), KemError::InvalidParam);

        // forged ciphertexts are not signalled; decaps returns a stable
        // pseudorandom secret instead
        let mut bad_ct_bytes = [0u8; kyber512::CT_LEN];
        rng.fill_bytes(&mut bad_ct_bytes);
        let bad_ct = kyber512::CipherText::try_from_bytes(&bad_ct_bytes).unwrap();
        let ssk1 = dk.try_decaps(&bad_ct).unwrap();
        let ssk2 = dk.try_decaps(&bad_ct).unwrap();
        assert_eq!(ssk1, ssk2);
    }
}


#[test]
fn test_wrong_length_inputs_512() {
    let long = [0u8; kyber512::DK_LEN + 1];

    for len in [0usize, 1, kyber512::EK_LEN - 1, kyber512::EK_LEN + 1] {
        let res = kyber512::EncapsKey::try_from_bytes(&long[..len]);
        assert_eq!(res.unwrap_err(), KemError::InvalidLength);
    }
    for len in [0usize, kyber512::DK_LEN - 1, kyber512::DK_LEN + 1] {
        let res = kyber512::DecapsKey::try_from_bytes(&long[..len]);
        assert_eq!(res.unwrap_err(), KemError::InvalidLength);
    }
    for len in [0usize, kyber512::CT_LEN - 1, kyber512::CT_LEN + 1] {
        let res = kyber512::CipherText::try_from_bytes(&long[..len]);
        assert_eq!(res.unwrap_err(), KemError::InvalidLength);
    }
    assert_eq!(SharedSecret::try_from_bytes(&long[..31]).unwrap_err(), KemError::InvalidLength);
}


#[test]
fn test_entropy_failure_is_surfaced_512() {
    let res = kyber512::KG::try_keygen_with_rng(&mut FailRng);
    assert_eq!(res.unwrap_err(), KemError::EntropyFailure);

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let (ek, _dk) = kyber512::KG::try_keygen_with_rng(&mut rng).unwrap();
    let res = ek.try_encaps_with_rng(&mut FailRng);
    assert_eq!(res.unwrap_err(), KemError::EntropyFailure);
}


// A keypair mismatch is caught by the correspondence check even when each
// key individually parses.
#[test]
fn test_mismatched_keypair_512() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(321);
    let (ek_a, _dk_a) = kyber512::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (_ek_b, dk_b) = kyber512::KG::try_keygen_with_rng(&mut rng).unwrap();
    assert!(!kyber512::KG::validate_keypair_vartime(
        &ek_a.into_bytes(),
        &dk_b.into_bytes()
    ));
}
