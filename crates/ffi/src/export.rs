//! FFI-exposed VTK image-data export.
//!
//! Lets an existing C/C++ solver dump its density and velocity arrays through
//! the Rust writer. Arrays are borrowed for the duration of the call only.

use crate::error::{FfiError, LbmVtiErrorCode};
use crate::helpers::finish;
use lbm_vti_core::{FieldSet, GridImageWriter, GridShape, OutputMode, VtkScalar, WriterConfig};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::PathBuf;
use tracing::debug;

/// Grid and output settings for one export call.
///
/// # Example
/// ```c
/// LbmVtiExportParams params = {
///     .nx = 256,
///     .ny = 128,
///     .ascii = false,
///     .step = 1200,
///     .output_dir = "results",
///     .output_prefix = NULL,  // "lbm_data"
/// };
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LbmVtiExportParams {
    /// Points along x (>= 1).
    pub nx: usize,
    /// Points along y (>= 1).
    pub ny: usize,
    /// `true` for inline ASCII, `false` for raw appended binary.
    pub ascii: bool,
    /// Time step used in the file name (>= 0).
    pub step: i64,
    /// Output directory, or null for the current directory. Must already exist.
    pub output_dir: *const c_char,
    /// File name prefix, or null for `"lbm_data"`.
    pub output_prefix: *const c_char,
}

/// Write single-precision fields to `<output_dir>/<output_prefix>_<step>.vti`.
///
/// # Returns
/// - `Ok` on success
/// - `NullPointer` if any array or `params` is null
/// - `InvalidGrid` if `nx` or `ny` is zero
/// - `InvalidParameter` if `step` is negative or a path string is not UTF-8
/// - `OpenFailed` / `WriteFailed` on I/O errors
/// - `PayloadTooLarge` if a binary block exceeds 4 GiB
///
/// # Safety
/// `rho`, `ux` and `uy` must each point to `nx * ny` readable `float` values.
/// `params` must point to a valid `LbmVtiExportParams`, whose string fields are
/// null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn lbm_vti_save_f32(
    rho: *const f32,
    ux: *const f32,
    uy: *const f32,
    params: *const LbmVtiExportParams,
) -> LbmVtiErrorCode {
    // SAFETY: forwarded caller contract.
    finish(unsafe { save(rho, ux, uy, params) })
}

/// Write double-precision fields to `<output_dir>/<output_prefix>_<step>.vti`.
///
/// Same return codes as [`lbm_vti_save_f32`].
///
/// # Safety
/// `rho`, `ux` and `uy` must each point to `nx * ny` readable `double` values.
/// `params` must point to a valid `LbmVtiExportParams`, whose string fields are
/// null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn lbm_vti_save_f64(
    rho: *const f64,
    ux: *const f64,
    uy: *const f64,
    params: *const LbmVtiExportParams,
) -> LbmVtiErrorCode {
    // SAFETY: forwarded caller contract.
    finish(unsafe { save(rho, ux, uy, params) })
}

unsafe fn save<T: VtkScalar>(
    rho: *const T,
    ux: *const T,
    uy: *const T,
    params: *const LbmVtiExportParams,
) -> Result<PathBuf, FfiError> {
    for (name, ptr) in [("rho", rho), ("ux", ux), ("uy", uy)] {
        if ptr.is_null() {
            return Err(FfiError::null_pointer(name));
        }
    }
    if params.is_null() {
        return Err(FfiError::null_pointer("params"));
    }

    // SAFETY: non-null, caller guarantees it points to a valid struct.
    let params = unsafe { &*params };
    let step = u64::try_from(params.step)
        .map_err(|_| FfiError::invalid_parameter(format!("step must be >= 0, got {}", params.step)))?;
    let grid = GridShape::new(params.nx, params.ny)?;

    let mut config = WriterConfig::default();
    // SAFETY: caller guarantees null or NUL-terminated.
    if let Some(dir) = unsafe { optional_str(params.output_dir, "output_dir") }? {
        config = config.with_output_dir(dir);
    }
    // SAFETY: caller guarantees null or NUL-terminated.
    if let Some(prefix) = unsafe { optional_str(params.output_prefix, "output_prefix") }? {
        config = config.with_output_prefix(prefix);
    }

    let n_points = grid.n_points();
    // SAFETY: caller guarantees each array holds nx * ny elements.
    let (rho, ux, uy) = unsafe {
        (
            std::slice::from_raw_parts(rho, n_points),
            std::slice::from_raw_parts(ux, n_points),
            std::slice::from_raw_parts(uy, n_points),
        )
    };
    let fields = FieldSet::new(rho, ux, uy, grid)?;

    let mode = if params.ascii {
        OutputMode::Ascii
    } else {
        OutputMode::BinaryAppended
    };
    let path = GridImageWriter::new(config).write(&fields, mode, step)?;
    debug!("FFI export wrote {}", path.display());
    Ok(path)
}

/// Borrow an optional C string as UTF-8.
unsafe fn optional_str<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<Option<&'a str>, FfiError> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null, caller guarantees NUL termination.
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str().map(Some).map_err(|_| {
        FfiError::invalid_parameter(format!("Parameter '{param_name}' is not valid UTF-8"))
    })
}
