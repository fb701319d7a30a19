use crate::sampling::sample_uniform;
use crate::symmetric::xof;
use crate::types::{Poly, PolyNtt};


/// Expands the public matrix Â ∈ `R_q^{k×k}` from ρ, entry by entry, in the
/// NTT domain. Entry (i, j) of the untransposed matrix is seeded with the
/// domain-separation bytes (j, i); passing `transpose` mirrors the seeding,
/// yielding Âᵀ without a second multiplication path. Key generation takes Â,
/// encryption takes Âᵀ, and the two sides agree because the seeding mirrors.
pub(crate) fn sample_matrix<const K: usize>(
    rho: &[u8; 32], transpose: bool,
) -> [[PolyNtt; K]; K] {
    core::array::from_fn(|i| {
        core::array::from_fn(|j| {
            let (row, col) = if transpose { (j, i) } else { (i, j) };
            sample_uniform(xof(rho, col.to_le_bytes()[0], row.to_le_bytes()[0]))
        })
    })
}


/// Pointwise vector addition over normal-domain ring vectors.
#[must_use]
pub(crate) fn add_vec<const K: usize>(a: &[Poly; K], b: &[Poly; K]) -> [Poly; K] {
    core::array::from_fn(|i| a[i].add(&b[i]))
}


/// Pointwise vector addition over NTT-domain ring vectors.
#[must_use]
pub(crate) fn add_vec_ntt<const K: usize>(a: &[PolyNtt; K], b: &[PolyNtt; K]) -> [PolyNtt; K] {
    core::array::from_fn(|i| a[i].add(&b[i]))
}


/// NTT-domain dot product `⟨â, b̂⟩ = Σ â_i ⊙ b̂_i`.
#[must_use]
pub(crate) fn dot<const K: usize>(a: &[PolyNtt; K], b: &[PolyNtt; K]) -> PolyNtt {
    let mut acc = PolyNtt::ZERO;
    for i in 0..K {
        acc = acc.add(&a[i].mul(&b[i]));
    }
    acc
}


/// Matrix-vector product over NTT-domain elements: row i of the result is
/// `⟨m[i], v⟩`.
#[must_use]
pub(crate) fn mat_vec_mul<const K: usize>(
    m: &[[PolyNtt; K]; K], v: &[PolyNtt; K],
) -> [PolyNtt; K] {
    core::array::from_fn(|i| dot(&m[i], v))
}


#[cfg(test)]
mod tests {
    use super::sample_matrix;

    #[test]
    fn test_transpose_mirrors_seeding() {
        let rho = [0x19u8; 32];
        let a = sample_matrix::<3>(&rho, false);
        let at = sample_matrix::<3>(&rho, true);
        for i in 0..3 {
            for j in 0..3 {
                for n in 0..256 {
                    assert_eq!(a[i][j].0[n].get_u16(), at[j][i].0[n].get_u16());
                }
            }
        }
    }
}
