use lbm_vti_core::VtiError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// FFI error codes returned by export functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LbmVtiErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Grid dimensions must both be at least one.
    InvalidGrid = 2,

    /// Invalid parameter passed to function (negative step, non-UTF-8 path).
    InvalidParameter = 3,

    /// Output file could not be created or opened.
    OpenFailed = 4,

    /// Output file was opened but writing or flushing failed.
    WriteFailed = 5,

    /// One binary block does not fit in the 32-bit length prefix.
    PayloadTooLarge = 6,
}

/// Error crossing the FFI boundary: a code plus a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FfiError {
    code: LbmVtiErrorCode,
    msg: String,
}

impl FfiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"rho"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: LbmVtiErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for an invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: LbmVtiErrorCode::InvalidParameter,
            msg: message,
        }
    }

    pub fn code(&self) -> LbmVtiErrorCode {
        self.code
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<VtiError> for FfiError {
    fn from(error: VtiError) -> Self {
        let code = match &error {
            VtiError::InvalidGrid { .. } => LbmVtiErrorCode::InvalidGrid,
            VtiError::LengthMismatch { .. } => LbmVtiErrorCode::InvalidParameter,
            VtiError::PayloadTooLarge { .. } => LbmVtiErrorCode::PayloadTooLarge,
            VtiError::Open { .. } => LbmVtiErrorCode::OpenFailed,
            VtiError::Write { .. } | VtiError::Sink(_) => LbmVtiErrorCode::WriteFailed,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored so the pointer handed to C stays valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, LbmVtiErrorCode)> = const { RefCell::new((None, LbmVtiErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, LbmVtiErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, LbmVtiErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call failed.
/// - `null` if the last call succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread sees its own last error.
///
/// # Lifetime
/// The returned pointer is valid until the next export call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// LbmVtiExportParams params = {};
/// params.nx = nx;
/// params.ny = ny;
/// params.ascii = false;
/// params.step = step;
/// params.output_dir = "out";
/// params.output_prefix = nullptr;
///
/// LbmVtiErrorCode err = lbm_vti_save_f64(rho, ux, uy, &params);
/// if (err != LbmVtiErrorCode::Ok) {
///     const char* error = lbm_vti_get_last_error();
///     if (error) {
///         printf("VTK dump failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn lbm_vti_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `LbmVtiErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn lbm_vti_get_last_error_code() -> LbmVtiErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
