use crate::error::{with_last_error_mut, FfiError, LbmVtiErrorCode};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
pub(crate) fn set_last_error(error: &FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &FfiError) -> LbmVtiErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = LbmVtiErrorCode::Ok;
    });
}

/// Record the outcome of an FFI call and return its code.
pub(crate) fn finish<T>(result: Result<T, FfiError>) -> LbmVtiErrorCode {
    match result {
        Ok(_) => {
            clear_last_error();
            LbmVtiErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}
