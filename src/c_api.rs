// C ABI over a single process-wide engine.
// It uses raw pointers and catch_unwind for stability.
use crate::config::EngineConfig;
use crate::SimilarityEngine;
use libc::c_char;
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::ptr;
use tracing::{error, info};

static mut SIM_ENGINE: *mut SimilarityEngine = ptr::null_mut();

/// Returned by `char_sim_compute` when the score could not be computed.
pub const CHAR_SIM_ERROR: f64 = -1.0;

unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

/// Loads the dictionaries from `data_dir` (or the default location when null).
/// Returns 0 on success, -1 on failure. Calling it twice is a no-op.
#[no_mangle]
pub extern "C" fn char_sim_engine_init(data_dir: *const c_char) -> i32 {
    let result = catch_unwind(|| unsafe {
        if !SIM_ENGINE.is_null() {
            return 0;
        }
        let config = EngineConfig {
            data_dir: str_arg(data_dir).filter(|s| !s.is_empty()).map(PathBuf::from),
            ..EngineConfig::default()
        };
        match SimilarityEngine::open(&config) {
            Ok(engine) => {
                SIM_ENGINE = Box::into_raw(Box::new(engine));
                info!("Character similarity engine initialized");
                0
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize character similarity engine");
                -1
            }
        }
    });
    result.unwrap_or_else(|_| {
        error!("A panic occurred during engine initialization");
        -1
    })
}

#[no_mangle]
pub extern "C" fn char_sim_engine_destroy() {
    unsafe {
        if SIM_ENGINE.is_null() {
            return;
        }
        drop(Box::from_raw(SIM_ENGINE));
        SIM_ENGINE = ptr::null_mut();
    }
}

unsafe fn get_engine<'a>() -> Option<&'a SimilarityEngine> {
    SIM_ENGINE.as_ref()
}

/// Similarity of two characters under `kind` (null means "shape"), rounded to
/// the default precision. Returns `CHAR_SIM_ERROR` on any failure.
#[no_mangle]
pub extern "C" fn char_sim_compute(
    char1: *const c_char,
    char2: *const c_char,
    kind: *const c_char,
) -> f64 {
    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        let engine = get_engine()?;
        let (a, b) = (str_arg(char1)?, str_arg(char2)?);
        let kind = str_arg(kind).unwrap_or("shape");
        match engine.compute(a, b, kind, None) {
            Ok(score) => Some(score),
            Err(e) => {
                error!(error = %e, "char_sim_compute failed");
                None
            }
        }
    }));
    match result {
        Ok(Some(score)) => score,
        Ok(None) => CHAR_SIM_ERROR,
        Err(_) => {
            error!("Panic in char_sim_compute");
            CHAR_SIM_ERROR
        }
    }
}

/// Per-attribute sub-scores as a JSON object, or "{}" on failure.
/// The caller releases the string with `char_sim_free_string`.
#[no_mangle]
pub extern "C" fn char_sim_breakdown_json(char1: *const c_char, char2: *const c_char) -> *mut c_char {
    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        let engine = get_engine()?;
        let breakdown = engine.breakdown(str_arg(char1)?, str_arg(char2)?).ok()?;
        serde_json::to_string(&breakdown).ok()
    }));
    let json_string = match result {
        Ok(Some(json)) => json,
        Ok(None) => "{}".to_string(),
        Err(_) => {
            error!("Panic in char_sim_breakdown_json");
            "{}".to_string()
        }
    };
    CString::new(json_string).map_or(ptr::null_mut(), CString::into_raw)
}

#[no_mangle]
pub extern "C" fn char_sim_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}
