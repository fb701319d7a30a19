use crate::Q;

/// A coefficient in `Z_q`. Stored as `u16`, with arithmetic widened to
/// `u32`/`u64` so that products are reduced before they can overflow.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Z(pub(crate) u16);


#[allow(clippy::inline_always)]
impl Z {
    #[allow(clippy::cast_possible_truncation)]
    const Q16: u16 = Q as u16;

    pub(crate) fn get_u16(self) -> u16 { self.0 }

    pub(crate) fn get_u32(self) -> u32 { u32::from(self.0) }

    pub(crate) fn set_u16(&mut self, a: u16) { self.0 = a }

    /// Branch-free addition mod q.
    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)] // res as u16; res < q
    pub(crate) fn add(self, other: Self) -> Self {
        debug_assert!(self.0 < Self::Q16);
        debug_assert!(other.0 < Self::Q16);
        let res = u32::from(self.0) + u32::from(other.0);
        let res = res.wrapping_sub(Q);
        let res = res.wrapping_add((res >> 16) & Q);
        debug_assert!(res < u32::from(Self::Q16));
        Self(res as u16)
    }

    /// Branch-free subtraction mod q.
    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)] // res as u16; res < q
    pub(crate) fn sub(self, other: Self) -> Self {
        debug_assert!(self.0 < Self::Q16);
        debug_assert!(other.0 < Self::Q16);
        let res = u32::from(self.0).wrapping_sub(u32::from(other.0));
        let res = res.wrapping_add((res >> 16) & Q);
        debug_assert!(res < u32::from(Self::Q16));
        Self(res as u16)
    }

    /// Barrett-reduced product; exact for operands below q, no trailing
    /// conditional subtraction required.
    #[inline(always)]
    #[allow(clippy::cast_possible_truncation, clippy::items_after_statements)]
    pub(crate) fn mul(self, other: Self) -> Self {
        debug_assert!(self.0 < Self::Q16);
        debug_assert!(other.0 < Self::Q16);
        const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;
        let prod = u32::from(self.0) * u32::from(other.0);
        let quot = ((u64::from(prod) * M) >> 36) as u32;
        let rem = prod - quot * Q;
        debug_assert!(rem < u32::from(Self::Q16));
        Self(rem as u16)
    }
}


/// Ring element of `R_q` in the normal (coefficient) domain.
#[derive(Clone, Copy)]
pub(crate) struct Poly(pub(crate) [Z; 256]);

/// Ring element in the NTT domain. A distinct type, so that pointwise
/// multiplication of normal-domain elements (or an inverse transform of
/// something never transformed) is a compile-time error.
#[derive(Clone, Copy)]
pub(crate) struct PolyNtt(pub(crate) [Z; 256]);


impl Poly {
    pub(crate) const ZERO: Self = Self([Z(0); 256]);

    pub(crate) fn add(&self, other: &Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].add(other.0[i])))
    }

    pub(crate) fn sub(&self, other: &Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].sub(other.0[i])))
    }

    /// Negacyclic schoolbook product, reduced mod `X^256 + 1` on the fly.
    /// The semantic reference that the NTT multiplication path must match.
    #[cfg(test)]
    pub(crate) fn mul_schoolbook(&self, other: &Self) -> Self {
        let mut res = [Z::default(); 256];
        for i in 0..256 {
            for j in 0..256 {
                let prod = self.0[i].mul(other.0[j]);
                if i + j < 256 {
                    res[i + j] = res[i + j].add(prod);
                } else {
                    res[i + j - 256] = res[i + j - 256].sub(prod);
                }
            }
        }
        Self(res)
    }

    #[cfg(test)]
    pub(crate) fn neg(&self) -> Self {
        Self(core::array::from_fn(|i| Z::default().sub(self.0[i])))
    }
}


impl PolyNtt {
    pub(crate) const ZERO: Self = Self([Z(0); 256]);

    pub(crate) fn add(&self, other: &Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].add(other.0[i])))
    }
}
