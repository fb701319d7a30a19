use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};


/// Function `G`: SHA3-512 over the concatenated parts, split into two
/// 32-byte halves. Produces `(rho, sigma)` at key generation and
/// `(k_bar, r)` during encapsulation.
pub(crate) fn g(parts: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    parts.iter().for_each(|p| Digest::update(&mut hasher, p));
    let digest = hasher.finalize();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    a.copy_from_slice(&digest[0..32]);
    b.copy_from_slice(&digest[32..64]);
    (a, b)
}


/// Function `H`: SHA3-256. Hashes public values (encapsulation keys and
/// ciphertexts) down to 32 bytes.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    hasher.finalize().into()
}


/// Function `KDF`: SHAKE-256 squeezed to 32 bytes; the final hash from
/// which both the honest and the implicit-rejection shared secrets are
/// derived.
pub(crate) fn kdf(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    parts.iter().for_each(|p| hasher.update(p));
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; 32];
    reader.read(&mut out);
    out
}


/// Function `PRF`: SHAKE-256 over seed ‖ nonce, squeezed to `64·η` bytes.
/// Drives the CBD samplers; each nonce yields an independent stream.
#[must_use]
pub(crate) fn prf<const ETA_64: usize>(seed: &[u8; 32], nonce: u8) -> [u8; ETA_64] {
    let mut hasher = Shake256::default();
    hasher.update(seed);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; ETA_64];
    reader.read(&mut out);
    out
}


/// Function `XOF`: SHAKE-128 over ρ ‖ i ‖ j, returned as an unbounded
/// reader. The two index bytes domain-separate the matrix entries; the
/// rejection sampler squeezes as much of the stream as it needs.
#[must_use]
pub(crate) fn xof(rho: &[u8; 32], i: u8, j: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[i]);
    hasher.update(&[j]);
    hasher.finalize_xof()
}


#[cfg(test)]
mod tests {
    use super::{g, h, kdf, prf, xof};
    use sha3::digest::XofReader;

    #[test]
    fn test_deterministic_and_domain_separated() {
        let seed = [0x42u8; 32];

        let (a1, b1) = g(&[&seed]);
        let (a2, b2) = g(&[&seed]);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert_ne!(a1, b1);

        assert_eq!(h(&seed), h(&seed));
        assert_eq!(kdf(&[&seed]), kdf(&[&seed]));
        assert_ne!(h(&seed), kdf(&[&seed]));

        let p1: [u8; 128] = prf::<128>(&seed, 0);
        let p2: [u8; 128] = prf::<128>(&seed, 1);
        assert_ne!(p1, p2);

        let mut s1 = [0u8; 96];
        let mut s2 = [0u8; 96];
        xof(&seed, 0, 1).read(&mut s1);
        xof(&seed, 1, 0).read(&mut s2);
        assert_ne!(s1, s2);
    }
}
