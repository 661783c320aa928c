//! Lattice-Boltzmann VTK Image Data Export
//!
//! Serializes a 2-D density/velocity field on a regular grid into the VTK
//! `ImageData` XML format (`.vti`), readable by `ParaView` and `VisIt`.
//!
//! ## Output
//!
//! Each call writes one self-contained file holding four point-data arrays:
//! - `rho`: density
//! - `ux`, `uy`: velocity components
//! - `uNorm`: velocity magnitude, derived while writing
//!
//! Files are either ASCII (inline text) or binary with raw appended blocks.
//! The element type (`f32` or `f64`) selects the declared precision.

// Grid, precision and borrowed field types
pub mod core_types;

// File naming and the writer itself
pub mod export;

pub mod error;

pub use core_types::{
    AsciiValue, ByteOrder, FieldSet, GridParams, GridShape, PointField, Precision, VtkScalar,
};
pub use error::{Result, VtiError};
pub use export::{write_to, AppendedLayout, GridImageWriter, OutputMode, WriterConfig};
