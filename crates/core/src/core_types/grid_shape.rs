//! Structured 2-D grid description
//!
//! Points are stored row-major with `i` varying fastest: `index = i + nx * j`.
//! Geometry is implicit: unit spacing, origin at zero, degenerate z extent.

use std::fmt;

use crate::error::{Result, VtiError};

/// Origin written to every file
pub const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];

/// Spacing written to every file (z is degenerate)
pub const SPACING: [f64; 3] = [1.0, 1.0, 0.0];

/// Point counts along each axis of a regular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    nx: usize,
    ny: usize,
}

impl GridShape {
    /// Create a grid shape.
    ///
    /// # Errors
    /// Returns [`VtiError::InvalidGrid`] if either axis has zero points or the
    /// point count overflows `usize`.
    pub fn new(nx: usize, ny: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nx.checked_mul(ny).is_none() {
            return Err(VtiError::InvalidGrid { nx, ny });
        }
        Ok(Self { nx, ny })
    }

    /// Points along x
    #[inline]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// Points along y
    #[inline]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of points
    #[inline]
    pub const fn n_points(&self) -> usize {
        self.nx * self.ny
    }

    /// Linear index of point `(i, j)`
    #[inline]
    pub const fn index(&self, i: usize, j: usize) -> usize {
        i + self.nx * j
    }

    /// Extent string shared by `ImageData` and `Piece`: `"0 nx-1 0 ny-1 0 0"`
    pub fn whole_extent(&self) -> String {
        format!("0 {} 0 {} 0 0", self.nx - 1, self.ny - 1)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.nx, self.ny)
    }
}

/// Read access to the grid dimensions of a simulation's parameter set.
///
/// Solvers usually keep `nx`/`ny` in a larger parameter struct; implementing
/// this trait lets the exporter read them without owning that struct.
pub trait GridParams {
    /// Points along x
    fn nx(&self) -> usize;

    /// Points along y
    fn ny(&self) -> usize;

    /// Validated grid shape
    ///
    /// # Errors
    /// Returns [`VtiError::InvalidGrid`] if either dimension is zero.
    fn shape(&self) -> Result<GridShape> {
        GridShape::new(self.nx(), self.ny())
    }
}

impl GridParams for GridShape {
    fn nx(&self) -> usize {
        self.nx
    }

    fn ny(&self) -> usize {
        self.ny
    }

    fn shape(&self) -> Result<GridShape> {
        Ok(*self)
    }
}
