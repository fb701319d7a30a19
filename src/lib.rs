#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]


// Secret material is cleared on drop throughout
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

// Functionality map per the round-3 CRYSTALS-Kyber submission
//
// Kyber.CPAPKE.KeyGen (Algorithm 4)        --> pke.rs
// Kyber.CPAPKE.Enc (Algorithm 5)           --> pke.rs
// Kyber.CPAPKE.Dec (Algorithm 6)           --> pke.rs
// Kyber.CCAKEM.KeyGen (Algorithm 7)        --> kem.rs
// Kyber.CCAKEM.Enc (Algorithm 8)           --> kem.rs
// Kyber.CCAKEM.Dec (Algorithm 9)           --> kem.rs
// NTT, NTT^-1, basecase multiplication     --> ntt.rs
// Parse (uniform rejection), CBD           --> sampling.rs
// Compress/Decompress, Encode/Decode       --> codec.rs
// XOF, PRF, G, H, KDF                      --> symmetric.rs
// A-matrix expansion, vector operations    --> matrix.rs
//
// The three parameter sets are modules in this file with injected macro code
// connecting them to the shared functionality.

/// If the condition is not met, return the given error. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

mod codec;
mod kem;
mod matrix;
mod ntt;
mod pke;
mod sampling;
mod symmetric;
mod types;

/// All public operations are covered by traits, such that consumers can
/// utilize trait objects as desired.
pub mod traits;

// Relevant to all parameter sets
const Q: u32 = 3329;
const ZETA: u32 = 17;

/// Shared secret length in bytes, common to all parameter sets.
pub const SSK_LEN: usize = 32;


/// The error conditions surfaced by this crate. Note that a malformed
/// ciphertext of the correct length is deliberately *not* an error:
/// decapsulation implicitly rejects it by returning a pseudorandom secret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KemError {
    /// A serialized key or ciphertext had the wrong byte length; rejected
    /// before any cryptographic work.
    InvalidLength,
    /// A parameter or encoding outside the supported sets, such as an
    /// encapsulation key whose packed coefficients fail the modulus check.
    InvalidParam,
    /// The random byte source declined to produce bytes.
    EntropyFailure,
}

impl core::fmt::Display for KemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLength => f.write_str("incorrectly sized key or ciphertext"),
            Self::InvalidParam => f.write_str("unsupported parameter or encoding"),
            Self::EntropyFailure => f.write_str("random number generator failed"),
        }
    }
}

impl core::error::Error for KemError {}


/// The 32-byte shared secret agreed by the two parties.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(pub(crate) [u8; SSK_LEN]);

impl SerDes for SharedSecret {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
        ensure!(bytes.len() == SSK_LEN, KemError::InvalidLength);
        let mut ssk = [0u8; SSK_LEN];
        ssk.copy_from_slice(bytes);
        Ok(SharedSecret(ssk))
    }
}

// Comparison must not leak where two secrets first differ
impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        const ETA1_64: usize = ETA1 as usize * 64;
        const ETA2_64: usize = ETA2 as usize * 64;

        use crate::codec::unpack;
        use crate::kem::{kem_decaps, kem_encaps, kem_key_gen, kem_key_gen_from_seed};
        use crate::symmetric::h;
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::{KemError, SharedSecret};
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized encapsulation key specific to the target parameter set.
        #[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; EK_LEN]);

        /// Correctly sized decapsulation key specific to the target parameter set.
        #[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; DK_LEN]);

        /// Correctly sized ciphertext specific to the target parameter set.
        #[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Key generation entry point for this parameter set. Produces an
        /// encapsulation key that can be published and a decapsulation key
        /// that must remain private.
        pub struct KG;

        impl KeyGen for KG {
            type DecapsByteArray = [u8; DK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; EK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), KemError> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                kem_key_gen::<K, ETA1_64>(rng, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }

            fn keygen_from_seed(
                d: [u8; 32], z: [u8; 32],
            ) -> Result<(EncapsKey, DecapsKey), KemError> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                kem_key_gen_from_seed::<K, ETA1_64>(d, z, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }

            fn validate_keypair_vartime(ek: &[u8; EK_LEN], dk: &[u8; DK_LEN]) -> bool {
                let p1 = 384 * K;
                let p2 = p1 + EK_LEN;
                (dk[p1..p2] == ek[..]) & (h(ek) == dk[p2..p2 + 32])
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecret = SharedSecret;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(SharedSecret, CipherText), KemError> {
                let mut ct = [0u8; CT_LEN];
                let ssk = kem_encaps::<K, ETA1_64, ETA2_64>(rng, DU, DV, &self.0, &mut ct)?;
                Ok((ssk, CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecret = SharedSecret;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecret, KemError> {
                kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &self.0, &ct.0)
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
                ensure!(bytes.len() == EK_LEN, KemError::InvalidLength);
                // the packed coefficients must decode below q
                for chunk in bytes[..384 * K].chunks(384) {
                    unpack(12, chunk)?;
                }
                let mut ek = [0u8; EK_LEN];
                ek.copy_from_slice(bytes);
                Ok(EncapsKey(ek))
            }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
                ensure!(bytes.len() == DK_LEN, KemError::InvalidLength);
                // both the secret vector and the embedded encapsulation key
                // must pass the modulus check
                for chunk in bytes[..768 * K].chunks(384) {
                    unpack(12, chunk)?;
                }
                let mut dk = [0u8; DK_LEN];
                dk.copy_from_slice(bytes);
                Ok(DecapsKey(dk))
            }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
                ensure!(bytes.len() == CT_LEN, KemError::InvalidLength);
                let mut ct = [0u8; CT_LEN];
                ct.copy_from_slice(bytes);
                Ok(CipherText(ct))
            }
        }
    };
}


/// Functionality for the Kyber-512 parameter set (claimed security category 1).
#[cfg(feature = "kyber-512")]
pub mod kyber512 {
    //!
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` to get an encapsulation key and a decapsulation key.
    //! 2. The originator serializes the encapsulation key via `into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes it via `EncapsKey::try_from_bytes()` and runs `try_encaps()` to get a
    //!    shared secret and a ciphertext.
    //! 4. The remote party serializes the ciphertext via `into_bytes()` and sends it to the originator.
    //! 5. The originator deserializes the ciphertext via `CipherText::try_from_bytes()` and runs
    //!    `try_decaps()` to recover the same shared secret.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized encapsulation key length in bytes.
    pub const EK_LEN: usize = 800;
    /// Serialized decapsulation key length in bytes.
    pub const DK_LEN: usize = 1632;
    /// Serialized ciphertext length in bytes.
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for the Kyber-768 parameter set (claimed security category 3).
#[cfg(feature = "kyber-768")]
pub mod kyber768 {
    //!
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` to get an encapsulation key and a decapsulation key.
    //! 2. The originator serializes the encapsulation key via `into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes it via `EncapsKey::try_from_bytes()` and runs `try_encaps()` to get a
    //!    shared secret and a ciphertext.
    //! 4. The remote party serializes the ciphertext via `into_bytes()` and sends it to the originator.
    //! 5. The originator deserializes the ciphertext via `CipherText::try_from_bytes()` and runs
    //!    `try_decaps()` to recover the same shared secret.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized encapsulation key length in bytes.
    pub const EK_LEN: usize = 1184;
    /// Serialized decapsulation key length in bytes.
    pub const DK_LEN: usize = 2400;
    /// Serialized ciphertext length in bytes.
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for the Kyber-1024 parameter set (claimed security category 5).
#[cfg(feature = "kyber-1024")]
pub mod kyber1024 {
    //!
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` to get an encapsulation key and a decapsulation key.
    //! 2. The originator serializes the encapsulation key via `into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes it via `EncapsKey::try_from_bytes()` and runs `try_encaps()` to get a
    //!    shared secret and a ciphertext.
    //! 4. The remote party serializes the ciphertext via `into_bytes()` and sends it to the originator.
    //! 5. The originator deserializes the ciphertext via `CipherText::try_from_bytes()` and runs
    //!    `try_decaps()` to recover the same shared secret.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized encapsulation key length in bytes.
    pub const EK_LEN: usize = 1568;
    /// Serialized decapsulation key length in bytes.
    pub const DK_LEN: usize = 3168;
    /// Serialized ciphertext length in bytes.
    pub const CT_LEN: usize = 1568;

    functionality!();
}
