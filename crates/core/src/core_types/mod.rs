//! Core types: grid, element precision, byte order and borrowed fields

pub mod byte_order;
pub mod grid_shape;
pub mod point_fields;
pub mod scalar;

pub use byte_order::ByteOrder;
pub use grid_shape::{GridParams, GridShape, ORIGIN, SPACING};
pub use point_fields::{FieldSet, PointField};
pub use scalar::{AsciiValue, Precision, VtkScalar};
