//! Borrowed point-data fields for a single export call

use crate::core_types::grid_shape::GridShape;
use crate::core_types::scalar::VtkScalar;
use crate::error::{Result, VtiError};

/// Point-data arrays emitted into every file, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointField {
    /// Density
    Rho,
    /// Velocity x component
    Ux,
    /// Velocity y component
    Uy,
    /// Velocity magnitude, derived at write time
    UNorm,
}

impl PointField {
    /// Fixed output order; array `k` in the file is `ALL[k]`
    pub const ALL: [PointField; 4] = [Self::Rho, Self::Ux, Self::Uy, Self::UNorm];

    /// `Name` attribute, case-sensitive
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rho => "rho",
            Self::Ux => "ux",
            Self::Uy => "uy",
            Self::UNorm => "uNorm",
        }
    }
}

/// Density and velocity components co-located on one grid.
///
/// Borrows the solver's arrays for the duration of a write; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct FieldSet<'a, T: VtkScalar> {
    rho: &'a [T],
    ux: &'a [T],
    uy: &'a [T],
    grid: GridShape,
}

impl<'a, T: VtkScalar> FieldSet<'a, T> {
    /// Bundle three arrays with their grid.
    ///
    /// # Errors
    /// Returns [`VtiError::LengthMismatch`] for the first array whose length is
    /// not `grid.n_points()`.
    pub fn new(rho: &'a [T], ux: &'a [T], uy: &'a [T], grid: GridShape) -> Result<Self> {
        let expected = grid.n_points();
        for (field, len) in [
            (PointField::Rho, rho.len()),
            (PointField::Ux, ux.len()),
            (PointField::Uy, uy.len()),
        ] {
            if len != expected {
                return Err(VtiError::LengthMismatch {
                    field: field.name(),
                    expected,
                    actual: len,
                });
            }
        }

        Ok(Self { rho, ux, uy, grid })
    }

    /// Grid shared by all fields
    #[inline]
    pub const fn grid(&self) -> GridShape {
        self.grid
    }

    /// Value of `field` at linear point `index`
    #[inline]
    pub fn value(&self, field: PointField, index: usize) -> T {
        match field {
            PointField::Rho => self.rho[index],
            PointField::Ux => self.ux[index],
            PointField::Uy => self.uy[index],
            PointField::UNorm => T::norm(self.ux[index], self.uy[index]),
        }
    }

    /// Value of `field` at grid point `(i, j)`
    #[inline]
    pub fn value_at(&self, field: PointField, i: usize, j: usize) -> T {
        self.value(field, self.grid.index(i, j))
    }

    /// Backing slice of a stored field; `None` for the derived [`PointField::UNorm`]
    #[inline]
    pub const fn stored(&self, field: PointField) -> Option<&'a [T]> {
        match field {
            PointField::Rho => Some(self.rho),
            PointField::Ux => Some(self.ux),
            PointField::Uy => Some(self.uy),
            PointField::UNorm => None,
        }
    }

    /// Values of `field` in natural array order
    pub fn values(&self, field: PointField) -> impl Iterator<Item = T> + 'a {
        let fields = *self;
        (0..fields.grid.n_points()).map(move |index| fields.value(field, index))
    }
}
