//! Boundary curve: the single obstacle of the scene
//!
//! The wall is the graph of an explicit function `y = height(x)`. Every curve
//! must also supply `slope(x)`, the exact analytic derivative of `height`; the
//! Newton solver relies on it and never differentiates numerically.

use serde::{Deserialize, Serialize};

/// An explicit scalar curve `y = height(x)` with its derivative
pub trait BoundaryCurve {
    /// Curve height at `x`
    fn height(&self, x: f64) -> f64;

    /// `d height / dx` at `x`
    fn slope(&self, x: f64) -> f64;
}

impl<C: BoundaryCurve + ?Sized> BoundaryCurve for &C {
    #[inline]
    fn height(&self, x: f64) -> f64 {
        (**self).height(x)
    }

    #[inline]
    fn slope(&self, x: f64) -> f64 {
        (**self).slope(x)
    }
}

impl<C: BoundaryCurve + ?Sized> BoundaryCurve for Box<C> {
    #[inline]
    fn height(&self, x: f64) -> f64 {
        (**self).height(x)
    }

    #[inline]
    fn slope(&self, x: f64) -> f64 {
        (**self).slope(x)
    }
}

/// Polynomial curve, coefficients in ascending powers (`c0 + c1 x + c2 x^2 ...`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    /// `y = a * x^2`
    pub fn parabola(a: f64) -> Self {
        Self::new(vec![0.0, 0.0, a])
    }

    /// `y = m * x + b`
    pub fn line(m: f64, b: f64) -> Self {
        Self::new(vec![b, m])
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::parabola(crate::consts::DEFAULT_PARABOLA)
    }
}

impl BoundaryCurve for Polynomial {
    fn height(&self, x: f64) -> f64 {
        // Horner
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    fn slope(&self, x: f64) -> f64 {
        self.coeffs
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (power, &c)| acc * x + power as f64 * c)
    }
}

/// A curve built from a pair of closures
///
/// The caller is responsible for `slope` being the derivative of `height`.
pub struct FnCurve<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    height: F,
    slope: D,
}

impl<F, D> FnCurve<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    pub fn new(height: F, slope: D) -> Self {
        Self { height, slope }
    }
}

impl<F, D> BoundaryCurve for FnCurve<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    #[inline]
    fn height(&self, x: f64) -> f64 {
        (self.height)(x)
    }

    #[inline]
    fn slope(&self, x: f64) -> f64 {
        (self.slope)(x)
    }
}
