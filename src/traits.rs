use crate::KemError;
use rand_core::{CryptoRng, CryptoRngCore, RngCore};

#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// Key generation for a target security parameter set; implemented by the
/// per-parameter-set `KG` structs, defined as a trait so that consumers can
/// use trait objects as desired.
pub trait KeyGen {
    /// The (public) encapsulation key sent from the originator to the remote party.
    type EncapsKey;
    /// The (private) decapsulation key retained by the originator.
    type DecapsKey;
    /// A serialized encapsulation key byte array of the correct length.
    type EncapsByteArray;
    /// A serialized decapsulation key byte array of the correct length.
    type DecapsByteArray;

    /// Generates an encapsulation and decapsulation key pair using the OS
    /// default random number generator.
    ///
    /// # Errors
    /// Returns [`KemError::EntropyFailure`] if the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-512", feature = "default-rng"))] {
    /// use kyber_kem::kyber512;
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = kyber512::KG::try_keygen()?; // Party 1 generates both keys
    /// let ek_bytes = ek.into_bytes(); // Party 1 serializes the encaps key
    ///
    /// let ek2 = kyber512::EncapsKey::try_from_bytes(&ek_bytes)?; // Party 2 deserializes
    /// let (ssk2, ct) = ek2.try_encaps()?; // Party 2 generates shared secret and ciphertext
    ///
    /// let ssk1 = dk.try_decaps(&ct)?; // Party 1 runs decaps on the received ciphertext
    /// assert_eq!(ssk1, ssk2); // Both parties hold the same shared secret
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsKey, Self::DecapsKey), KemError> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates an encapsulation and decapsulation key pair using the
    /// provided random number generator.
    ///
    /// # Errors
    /// Returns [`KemError::EntropyFailure`] if the random number generator fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), KemError>;

    /// Generates a key pair deterministically from the 32-byte seed `d` and
    /// the 32-byte implicit-rejection seed `z`. The same seeds always yield
    /// the same key pair; this supports reproducible deployments and testing.
    ///
    /// # Errors
    /// Reserved for future validation; does not fail for in-range inputs.
    fn keygen_from_seed(
        d: [u8; 32], z: [u8; 32],
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), KemError>;

    /// Checks the correspondence of a serialized key pair, perhaps after the
    /// two have been stored to and retrieved from disk: the decapsulation key
    /// must embed exactly this encapsulation key along with its hash. Not
    /// intended to run in constant time.
    fn validate_keypair_vartime(ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray) -> bool;
}


/// Encapsulation: generating a shared secret and the ciphertext that
/// transports it. Implemented by the per-parameter-set `EncapsKey`.
pub trait Encaps {
    /// The shared secret produced alongside the ciphertext.
    type SharedSecret;
    /// The ciphertext transmitted to the decapsulating party.
    type CipherText;

    /// Generates a shared secret and ciphertext using the OS default random
    /// number generator.
    ///
    /// # Errors
    /// Returns [`KemError::EntropyFailure`] if the random number generator
    /// fails, or [`KemError::InvalidParam`] for a key failing its modulus
    /// check.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-768", feature = "default-rng"))] {
    /// use kyber_kem::kyber768;
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen};
    ///
    /// let (ek, dk) = kyber768::KG::try_keygen()?;
    /// let (ssk_remote, ct) = ek.try_encaps()?;
    /// let ssk_local = dk.try_decaps(&ct)?;
    /// assert_eq!(ssk_remote, ssk_local);
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecret, Self::CipherText), KemError> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Generates a shared secret and ciphertext using the provided random
    /// number generator.
    ///
    /// # Errors
    /// Returns [`KemError::EntropyFailure`] if the random number generator
    /// fails, or [`KemError::InvalidParam`] for a key failing its modulus
    /// check.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecret, Self::CipherText), KemError>;

    /// Generates a shared secret and ciphertext deterministically from a
    /// 32-byte seed in place of fresh randomness. The same seed and key
    /// always produce the same pair.
    ///
    /// # Errors
    /// Returns [`KemError::InvalidParam`] for a key failing its modulus check.
    fn encaps_from_seed(
        &self, seed: &[u8; 32],
    ) -> Result<(Self::SharedSecret, Self::CipherText), KemError> {
        self.try_encaps_with_rng(&mut SeedRng { data: *seed })
    }
}


/// Decapsulation: recovering the shared secret from a ciphertext with the
/// decapsulation key. Implemented by the per-parameter-set `DecapsKey`.
pub trait Decaps {
    /// The ciphertext received from the encapsulating party.
    type CipherText;
    /// The recovered shared secret.
    type SharedSecret;

    /// Recovers the shared secret from a ciphertext. Runs in constant time;
    /// a forged ciphertext of the correct length yields a pseudorandom
    /// secret rather than an error.
    ///
    /// # Errors
    /// Returns [`KemError::InvalidParam`] for a decapsulation key failing its
    /// modulus check.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecret, KemError>;
}


/// Serialization to and from fixed-size byte arrays.
pub trait SerDes {
    /// The fixed-size byte array specific to the type being serialized.
    type ByteArray;

    /// Consumes the value and produces its byte array.
    fn into_bytes(self) -> Self::ByteArray;

    /// Validates and deserializes a byte slice. Length is checked before any
    /// cryptographic work; encapsulation keys additionally undergo the
    /// modulus check on their packed coefficients.
    ///
    /// # Errors
    /// Returns [`KemError::InvalidLength`] for a slice of the wrong size, or
    /// [`KemError::InvalidParam`] for content failing validation.
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, KemError>
    where
        Self: Sized;
}


// Replays a fixed seed through the RngCore interface, turning the rng-driven
// entry points into their deterministic from-seed variants.
struct SeedRng {
    data: [u8; 32],
}

impl RngCore for SeedRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!()
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!()
    }

    fn fill_bytes(&mut self, _out: &mut [u8]) {
        unimplemented!()
    }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        out.copy_from_slice(&self.data);
        Ok(())
    }
}

impl CryptoRng for SeedRng {}
