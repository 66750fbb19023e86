//! Rational arithmetic for frame rates and time bases.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;

/// A rational number kept in gcd-reduced form with a positive
/// denominator.
///
/// Used for frame rates and time bases, where floating point would
/// accumulate drift over long streams.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// Create a reduced rational.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "rational denominator must be non-zero");
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        if num == 0 {
            return Self { num: 0, den: 1 };
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i64;
        Self {
            num: num / g,
            den: den / g,
        }
    }

    /// Create a rational without reducing. For const contexts; the
    /// caller supplies an already-reduced, positive-denominator pair.
    pub const fn new_raw(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Numerator of the reduced form.
    pub fn num(&self) -> i64 {
        self.num
    }

    /// Denominator of the reduced form (always positive).
    pub fn den(&self) -> i64 {
        self.den
    }

    /// The reciprocal.
    ///
    /// # Panics
    ///
    /// Panics if the numerator is zero.
    pub fn invert(&self) -> Self {
        assert!(self.num != 0, "cannot invert zero");
        Self::new(self.den, self.num)
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Rescale `value` counted in units of `self` into units of
    /// `target`, truncating toward zero.
    pub fn rescale(&self, value: i64, target: Rational) -> i64 {
        let num = value as i128 * self.num as i128 * target.den as i128;
        let den = self.den as i128 * target.num as i128;
        (num / den) as i64
    }

    /// Rescale `value` into units of `target`, rounding half to even.
    ///
    /// Timestamp conversion across time bases uses this form so that
    /// rounding error does not bias packet spacing in one direction.
    pub fn rescale_rounded(&self, value: i64, target: Rational) -> i64 {
        let num = value as i128 * self.num as i128 * target.den as i128;
        let den = self.den as i128 * target.num as i128;
        div_half_even(num, den)
    }
}

/// Division rounding half to even, matching the symmetric rounding the
/// timestamp mapper requires.
fn div_half_even(num: i128, den: i128) -> i64 {
    debug_assert!(den != 0);
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    let twice = r * 2;
    let rounded = match twice.cmp(&den) {
        Ordering::Less => q,
        Ordering::Greater => q + 1,
        Ordering::Equal => {
            if q % 2 == 0 {
                q
            } else {
                q + 1
            }
        }
    };
    rounded as i64
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Self::new(num, den)
    }
}
