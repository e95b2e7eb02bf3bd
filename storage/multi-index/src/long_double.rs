//! IEEE-754 binary128 ("long double") values.

//---------------------------------------------------------------------------------------------------- Import
use bytemuck::{Pod, Zeroable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//---------------------------------------------------------------------------------------------------- Constants
/// Sign bit of a binary128.
pub(crate) const SIGN_MASK: u128 = 1 << 127;

/// Exponent bits of a binary128.
const EXPONENT_MASK: u128 = 0x7fff << 112;

/// Exponent bias difference between binary128 (16383) and binary64 (1023).
const EXPONENT_REBIAS: u128 = 16383 - 1023;

/// Difference in fraction width between binary128 (112) and binary64 (52).
const FRACTION_SHIFT: u32 = 112 - 52;

/// Fraction bits of a binary64.
const F64_FRACTION_MASK: u64 = (1 << 52) - 1;

//---------------------------------------------------------------------------------------------------- LongDouble
/// A long double secondary key, held as its raw binary128 bits.
///
/// Rust has no native binary128, so values are passed as
/// bits (little-endian on the wire) and only compared and
/// checked for NaN, never used for arithmetic.
///
/// ```rust
/// # use tabula_multi_index::LongDouble;
/// let one = LongDouble::from(1.0);
/// assert_eq!(one.to_bits(), 0x3fff << 112);
/// assert!(!one.is_nan());
/// assert!(LongDouble::from(f64::NAN).is_nan());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct LongDouble(u128);

impl LongDouble {
    /// Positive zero.
    pub const ZERO: Self = Self(0);

    /// Create a [`LongDouble`] from raw binary128 bits.
    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    /// The raw binary128 bits.
    pub const fn to_bits(self) -> u128 {
        self.0
    }

    /// Returns `true` if this is a NaN of either sign.
    pub const fn is_nan(self) -> bool {
        (self.0 & !SIGN_MASK) > EXPONENT_MASK
    }

    /// Returns `true` if this is `+0.0` or `-0.0`.
    pub const fn is_zero(self) -> bool {
        (self.0 & !SIGN_MASK) == 0
    }
}

impl From<f64> for LongDouble {
    /// Widen a binary64 to binary128.
    ///
    /// This is exact for every value, including subnormals,
    /// infinities and NaN payloads.
    fn from(value: f64) -> Self {
        let bits = value.to_bits();
        let sign = u128::from(bits >> 63) << 127;
        let exponent = (bits >> 52) & 0x7ff;
        let fraction = bits & F64_FRACTION_MASK;

        let (exponent, fraction) = match (exponent, fraction) {
            // Zero.
            (0, 0) => (0, 0),
            // Subnormal binary64 values are normal in binary128,
            // shift the leading bit into the implicit position.
            (0, fraction) => {
                let shift = fraction.leading_zeros() - 11;
                let fraction = (fraction << shift) & F64_FRACTION_MASK;
                (EXPONENT_REBIAS + 1 - u128::from(shift), fraction)
            }
            // Infinity and NaN.
            (0x7ff, fraction) => (0x7fff, fraction),
            (exponent, fraction) => (u128::from(exponent) + EXPONENT_REBIAS, fraction),
        };

        Self(sign | (exponent << 112) | (u128::from(fraction) << FRACTION_SHIFT))
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn widen_normal() {
        assert_eq!(LongDouble::from(1.0).to_bits(), 0x3fff << 112);
        assert_eq!(LongDouble::from(-2.0).to_bits(), SIGN_MASK | (0x4000 << 112));
        assert_eq!(
            LongDouble::from(1.5).to_bits(),
            (0x3fff << 112) | (1 << 111)
        );
    }

    #[test]
    fn widen_zero() {
        assert_eq!(LongDouble::from(0.0), LongDouble::ZERO);
        assert_eq!(LongDouble::from(-0.0).to_bits(), SIGN_MASK);
        assert!(LongDouble::from(-0.0).is_zero());
    }

    #[test]
    fn widen_subnormal() {
        // 2^-1074
        let smallest = LongDouble::from(f64::from_bits(1));
        assert_eq!(smallest.to_bits(), (16383 - 1074) << 112);

        // 2^-1023
        let largest_power = LongDouble::from(f64::from_bits(1 << 51));
        assert_eq!(largest_power.to_bits(), (16383 - 1023) << 112);
    }

    #[test]
    fn widen_special() {
        assert_eq!(LongDouble::from(f64::INFINITY).to_bits(), EXPONENT_MASK);
        assert_eq!(
            LongDouble::from(f64::NEG_INFINITY).to_bits(),
            SIGN_MASK | EXPONENT_MASK
        );
        assert!(!LongDouble::from(f64::INFINITY).is_nan());
        assert!(LongDouble::from(f64::NAN).is_nan());
        assert!(LongDouble::from(-f64::NAN).is_nan());
    }

    #[test]
    fn nan_bits() {
        assert!(LongDouble::from_bits(EXPONENT_MASK | 1).is_nan());
        assert!(LongDouble::from_bits(SIGN_MASK | EXPONENT_MASK | 1).is_nan());
        assert!(!LongDouble::from_bits(EXPONENT_MASK - 1).is_nan());
    }
}
