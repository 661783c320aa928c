//! C ABI for the lattice-Boltzmann VTK exporter.
//!
//! Exposes `lbm_vti_save_f32` / `lbm_vti_save_f64` so C and C++ solvers can
//! write `.vti` files, plus thread-local error reporting. The header
//! `LbmVtiFFI.h` is generated by `cbindgen` at build time.

mod error;
mod export;
mod helpers;

pub use error::{lbm_vti_get_last_error, lbm_vti_get_last_error_code, LbmVtiErrorCode};
pub use export::{lbm_vti_save_f32, lbm_vti_save_f64, LbmVtiExportParams};
