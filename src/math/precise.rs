//! Decimal arithmetic for evaluations that lose too much precision in `f64`.
//!
//! Near the asymptotes of a hyperbola, `sec` and `tan` grow without bound and
//! the cancellation in their products swamps native floating point. Those
//! paths run on [`Precise`] values instead and convert back to `f64` only at
//! the end. Every operation is checked: overflow surfaces as
//! [`GeometryError::PrecisionOverflow`] instead of a panic.
//!
//! Precision budget: `rust_decimal` carries 96 bits of mantissa (28-29
//! significant digits). A [`DecimalContext`] rounds each intermediate result
//! to `scale` decimal places (24 by default), leaving a few guard digits for
//! the integer part of values up to about `1e4`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};

use crate::error::{GeometryError, Result};

/// Largest scale a `rust_decimal` value can hold.
pub const MAX_SCALE: u32 = 28;

/// Default number of decimal places kept after each operation.
pub const DEFAULT_SCALE: u32 = 24;

/// Argument above which `atan` halves its input before summing the series.
const ATAN_SERIES_LIMIT: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

const ATAN_MAX_TERMS: usize = 256;

/// Precision settings for decimal evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalContext {
    scale: u32,
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl DecimalContext {
    /// Creates a context keeping `scale` decimal places, capped at [`MAX_SCALE`].
    #[must_use]
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.min(MAX_SCALE),
        }
    }

    /// Number of decimal places kept after each operation.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Converts a native float into a decimal value of this context.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite input or magnitudes beyond the
    /// decimal range.
    pub fn value(&self, x: f64) -> Result<Precise> {
        let value =
            Decimal::from_f64(x).ok_or(GeometryError::PrecisionOverflow("f64 conversion"))?;
        Ok(self.wrap(value))
    }

    /// The constant `pi` in this context.
    #[must_use]
    pub fn pi(&self) -> Precise {
        self.wrap(Decimal::PI)
    }

    fn wrap(&self, value: Decimal) -> Precise {
        Precise {
            value: value.round_dp(self.scale),
            scale: self.scale,
        }
    }
}

/// A decimal number bound to the scale of the context that produced it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Precise {
    value: Decimal,
    scale: u32,
}

impl Precise {
    fn with(self, value: Decimal) -> Self {
        Self {
            value: value.round_dp(self.scale),
            scale: self.scale,
        }
    }

    fn lift(self, value: Option<Decimal>, op: &'static str) -> Result<Self> {
        value
            .map(|v| self.with(v))
            .ok_or_else(|| GeometryError::PrecisionOverflow(op).into())
    }

    /// Returns `self + rhs`.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow.
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.lift(self.value.checked_add(rhs.value), "addition")
    }

    /// Returns `self - rhs`.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow.
    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.lift(self.value.checked_sub(rhs.value), "subtraction")
    }

    /// Returns `self * rhs`.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow.
    pub fn checked_mul(self, rhs: Self) -> Result<Self> {
        self.lift(self.value.checked_mul(rhs.value), "multiplication")
    }

    /// Returns `self / rhs`.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow or division by zero.
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        self.lift(self.value.checked_div(rhs.value), "division")
    }

    /// Multiplies by a small integer factor.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow.
    pub fn scaled(self, factor: i64) -> Result<Self> {
        self.lift(self.value.checked_mul(Decimal::from(factor)), "multiplication")
    }

    /// Returns `-self`.
    #[must_use]
    pub fn negated(self) -> Self {
        self.with(-self.value)
    }

    /// Returns `|self|`.
    #[must_use]
    pub fn abs(self) -> Self {
        self.with(self.value.abs())
    }

    /// Returns whether the value is below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Square root.
    ///
    /// # Errors
    ///
    /// Returns an error for negative input.
    pub fn sqrt(self) -> Result<Self> {
        self.lift(self.value.sqrt(), "square root")
    }

    /// Sine.
    ///
    /// # Errors
    ///
    /// Returns an error if the series overflows.
    pub fn sin(self) -> Result<Self> {
        self.lift(self.value.checked_sin(), "sine")
    }

    /// Cosine.
    ///
    /// # Errors
    ///
    /// Returns an error if the series overflows.
    pub fn cos(self) -> Result<Self> {
        self.lift(self.value.checked_cos(), "cosine")
    }

    /// Tangent, as `sin / cos`.
    ///
    /// The quotient keeps the full precision of the sine and cosine series.
    ///
    /// # Errors
    ///
    /// Returns an error at (or numerically at) an odd multiple of `pi/2`.
    pub fn tan(self) -> Result<Self> {
        let sin = self.sin()?;
        let cos = self.cos()?;
        self.lift(sin.value.checked_div(cos.value), "tangent")
    }

    /// Secant, `1 / cos`.
    ///
    /// # Errors
    ///
    /// Returns an error where the cosine vanishes.
    pub fn sec(self) -> Result<Self> {
        let cos = self.cos()?;
        self.lift(Decimal::ONE.checked_div(cos.value), "secant")
    }

    /// Arc tangent, in `(-pi/2, pi/2)`.
    ///
    /// # Errors
    ///
    /// Returns an error if an intermediate step overflows.
    pub fn atan(self) -> Result<Self> {
        if self.value.is_zero() {
            return Ok(self);
        }
        let negative = self.value.is_sign_negative();
        let mut x = self.value.abs();
        let inverted = x > Decimal::ONE;
        if inverted {
            x = Decimal::ONE
                .checked_div(x)
                .ok_or(GeometryError::PrecisionOverflow("arc tangent"))?;
        }

        // atan(x) = 2 atan(x / (1 + sqrt(1 + x^2)))
        let mut doublings = 0u32;
        while x > ATAN_SERIES_LIMIT {
            let root = (Decimal::ONE + x * x)
                .sqrt()
                .ok_or(GeometryError::PrecisionOverflow("arc tangent"))?;
            x /= Decimal::ONE + root;
            doublings += 1;
        }

        let x2 = x * x;
        let mut term = x;
        let mut sum = x;
        let mut n = Decimal::ONE;
        for _ in 0..ATAN_MAX_TERMS {
            term = -term * x2;
            n += Decimal::from(2u8);
            let step = (term / n).round_dp(MAX_SCALE);
            if step.is_zero() {
                break;
            }
            sum += step;
        }
        sum *= Decimal::from(1u64 << doublings);

        if inverted {
            sum = Decimal::HALF_PI - sum;
        }
        Ok(self.with(if negative { -sum } else { sum }))
    }

    /// Arc cosine, in `[0, pi]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `|self| > 1`.
    pub fn acos(self) -> Result<Self> {
        let x = self.value;
        if x.abs() > Decimal::ONE {
            return Err(
                GeometryError::Degenerate("acos argument outside [-1, 1]".into()).into(),
            );
        }
        if x == Decimal::ONE {
            return Ok(self.with(Decimal::ZERO));
        }
        if x == Decimal::NEGATIVE_ONE {
            return Ok(self.with(Decimal::PI));
        }
        let root = (Decimal::ONE - x * x)
            .sqrt()
            .ok_or(GeometryError::PrecisionOverflow("arc cosine"))?;
        let ratio = self.lift(x.checked_div(root), "arc cosine")?;
        Ok(self.with(Decimal::HALF_PI - ratio.atan()?.value))
    }

    /// Converts back to native floating point.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has no `f64` representation.
    pub fn to_f64(self) -> Result<f64> {
        self.value
            .to_f64()
            .ok_or_else(|| GeometryError::PrecisionOverflow("f64 conversion").into())
    }
}
