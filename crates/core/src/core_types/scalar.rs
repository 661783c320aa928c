//! Floating-point element types accepted by the exporter
//!
//! The writer is generic over [`VtkScalar`], which ties each element type to
//! its VTK precision tag and byte width. Only `f32` and `f64` implement it.

use bytemuck::Pod;
use std::fmt::{self, Display, LowerExp};

/// Magnitudes at or above this print in exponent form
const EXPONENT_ABOVE: f64 = 1e16;

/// Non-zero magnitudes below this print in exponent form
const EXPONENT_BELOW: f64 = 1e-5;

/// VTK `DataArray` precision tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
}

impl Precision {
    /// Select the tag from an element width in bytes.
    ///
    /// Width 8 maps to `Float64`; every other width maps to `Float32`.
    #[must_use]
    pub const fn from_width(bytes: usize) -> Self {
        if bytes == std::mem::size_of::<f64>() {
            Self::Float64
        } else {
            Self::Float32
        }
    }

    /// Value of the `type` attribute
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// Element width in bytes
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

/// Element type of an exported field.
///
/// `Display`/`LowerExp` supply the ASCII text form (shortest round-trip
/// representation, see [`AsciiValue`]), `Pod` supplies the native-endian bytes
/// for the appended binary block.
pub trait VtkScalar: Pod + Display + LowerExp + PartialEq + sealed::Sealed {
    /// Precision tag written into every `DataArray`
    const PRECISION: Precision;

    /// Size of one element in bytes
    const WIDTH: usize = std::mem::size_of::<Self>();

    /// Euclidean magnitude `sqrt(ux² + uy²)` in this precision
    fn norm(ux: Self, uy: Self) -> Self;

    /// Absolute value widened to `f64`
    fn magnitude(self) -> f64;
}

/// ASCII text form of one value.
///
/// Plain decimal for ordinary magnitudes (`1.0` prints as `1`), exponent form
/// for very large or very small ones so a token never grows to dozens of
/// digits. Both forms are the shortest representation that parses back to the
/// same value.
#[derive(Debug, Clone, Copy)]
pub struct AsciiValue<T>(pub T);

impl<T: VtkScalar> Display for AsciiValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.magnitude();
        if magnitude >= EXPONENT_ABOVE || (magnitude > 0.0 && magnitude < EXPONENT_BELOW) {
            write!(f, "{:e}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl VtkScalar for f32 {
    const PRECISION: Precision = Precision::from_width(std::mem::size_of::<f32>());

    #[inline]
    fn norm(ux: Self, uy: Self) -> Self {
        (ux * ux + uy * uy).sqrt()
    }

    #[inline]
    fn magnitude(self) -> f64 {
        f64::from(self.abs())
    }
}

impl VtkScalar for f64 {
    const PRECISION: Precision = Precision::from_width(std::mem::size_of::<f64>());

    #[inline]
    fn norm(ux: Self, uy: Self) -> Self {
        (ux * ux + uy * uy).sqrt()
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
