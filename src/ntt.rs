use crate::types::{Poly, PolyNtt, Z};
use crate::{Q, ZETA};


// Twiddle factors for the seven butterfly levels: ZETAS[i] = ζ^{BitRev7(i)} mod q.
// Both tables are derived from ζ = 17 at compile time.
#[allow(clippy::cast_possible_truncation)] // const fns cannot use u16::try_from etc.
const fn gen_zetas() -> [Z; 128] {
    let mut table = [Z(0); 128];
    let mut x = 1u32;
    let mut i = 0usize;
    while i < 128 {
        table[((i as u8).reverse_bits() >> 1) as usize] = Z(x as u16);
        x = (x * ZETA) % Q;
        i += 1;
    }
    table
}

// Base-case moduli for pointwise multiplication: GAMMAS[i] = ζ^{2·BitRev7(i)+1} mod q,
// the γ defining the i-th quotient ring `X^2 - γ`.
#[allow(clippy::cast_possible_truncation)]
const fn gen_gammas() -> [Z; 128] {
    let mut table = [Z(0); 128];
    let mut x = ZETA;
    let zeta_sq = (ZETA * ZETA) % Q;
    let mut i = 0usize;
    while i < 128 {
        table[((i as u8).reverse_bits() >> 1) as usize] = Z(x as u16);
        x = (x * zeta_sq) % Q;
        i += 1;
    }
    table
}

static ZETAS: [Z; 128] = gen_zetas();
static GAMMAS: [Z; 128] = gen_gammas();

// 128⁻¹ mod q, the global scaling applied by the inverse transform.
const INV_128: Z = Z(3303);


impl Poly {
    /// Forward NTT: in-place Cooley-Tukey butterflies over 7 levels, operand
    /// distance halving from 128 down to 2, one twiddle consumed per subrange.
    #[must_use]
    pub(crate) fn ntt(&self) -> PolyNtt {
        let mut f = self.0;
        let mut k = 1;
        for len in [128, 64, 32, 16, 8, 4, 2] {
            for start in (0..256).step_by(2 * len) {
                let zeta = ZETAS[k];
                k += 1;
                for j in start..(start + len) {
                    let t = f[j + len].mul(zeta);
                    f[j + len] = f[j].sub(t);
                    f[j] = f[j].add(t);
                }
            }
        }
        PolyNtt(f)
    }
}


impl PolyNtt {
    /// Inverse NTT: Gentleman-Sande butterflies in reverse level order,
    /// twiddles consumed from index 127 downward, then a global scaling
    /// by 128⁻¹ mod q.
    #[must_use]
    pub(crate) fn inv_ntt(&self) -> Poly {
        let mut f = self.0;
        let mut k = 127;
        for len in [2, 4, 8, 16, 32, 64, 128] {
            for start in (0..256).step_by(2 * len) {
                let zeta = ZETAS[k];
                k -= 1;
                for j in start..(start + len) {
                    let t = f[j];
                    f[j] = t.add(f[j + len]);
                    f[j + len] = zeta.mul(f[j + len].sub(t));
                }
            }
        }
        for c in &mut f {
            *c = c.mul(INV_128);
        }
        Poly(f)
    }

    /// Pointwise product in the NTT domain: 128 independent products of
    /// degree-one subpolynomials `a0 + a1·X` and `b0 + b1·X` mod `X^2 - γ`.
    #[must_use]
    pub(crate) fn mul(&self, other: &Self) -> Self {
        let mut h = [Z::default(); 256];
        for i in 0..128 {
            let (a0, a1) = (self.0[2 * i], self.0[2 * i + 1]);
            let (b0, b1) = (other.0[2 * i], other.0[2 * i + 1]);
            h[2 * i] = a0.mul(b0).add(a1.mul(b1).mul(GAMMAS[i]));
            h[2 * i + 1] = a0.mul(b1).add(a1.mul(b0));
        }
        Self(h)
    }
}
