//! # Density-Independent Pixels (Dp)
//!
//! Row heights and scroll offsets of picker components are expressed in
//! [`Dp`], a virtual unit independent of display density.
//!
//! ```
//! use storeline_ui::Dp;
//!
//! let row = Dp(44.0);
//! let offset = row * 3.0;
//! assert_eq!(offset / row, 3.0);
//! ```

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Density-independent pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dp(pub f64);

impl Dp {
    /// Zero dp.
    pub const ZERO: Self = Dp(0.0);

    /// Creates a new `Dp` value.
    pub const fn new(value: f64) -> Self {
        Dp(value)
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Dp(self.0.abs())
    }

    /// Clamps into `[min, max]`.
    pub fn clamp(self, min: Dp, max: Dp) -> Self {
        Dp(self.0.clamp(min.0, max.0))
    }
}

impl From<f64> for Dp {
    fn from(value: f64) -> Self {
        Dp::new(value)
    }
}

impl Add for Dp {
    type Output = Dp;

    fn add(self, rhs: Dp) -> Dp {
        Dp(self.0 + rhs.0)
    }
}

impl AddAssign for Dp {
    fn add_assign(&mut self, rhs: Dp) {
        self.0 += rhs.0;
    }
}

impl Sub for Dp {
    type Output = Dp;

    fn sub(self, rhs: Dp) -> Dp {
        Dp(self.0 - rhs.0)
    }
}

impl SubAssign for Dp {
    fn sub_assign(&mut self, rhs: Dp) {
        self.0 -= rhs.0;
    }
}

impl Neg for Dp {
    type Output = Dp;

    fn neg(self) -> Dp {
        Dp(-self.0)
    }
}

impl Mul<f64> for Dp {
    type Output = Dp;

    fn mul(self, rhs: f64) -> Dp {
        Dp(self.0 * rhs)
    }
}

impl Div<f64> for Dp {
    type Output = Dp;

    fn div(self, rhs: f64) -> Dp {
        Dp(self.0 / rhs)
    }
}

/// Ratio of two lengths, e.g. how many rows fit in an offset.
impl Div<Dp> for Dp {
    type Output = f64;

    fn div(self, rhs: Dp) -> f64 {
        self.0 / rhs.0
    }
}
