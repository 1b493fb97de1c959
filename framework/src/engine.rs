//! Loader for the native tessellation engine.
//!
//! The engine is an opaque shared library. It is loaded once per process
//! during bootstrap and stays loaded until the process exits; a load failure
//! aborts startup.

use std::ffi::{c_float, c_int, c_uint, c_void, CStr, CString};
use std::mem;
use std::sync::OnceLock;

use log::info;
use thiserror::Error;

/// Short name of the engine library, expanded by [`library_filename`].
pub const ENGINE_LIBRARY_NAME: &str = "tessellation";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load engine library `{name}`: {reason}")]
    Load { name: String, reason: String },
    #[error("engine library is missing symbol `{symbol}`: {reason}")]
    Symbol { symbol: String, reason: String },
    #[error("engine initialization failed with status {0}")]
    Init(i32),
    #[error("engine frame processing failed with status {0}")]
    Frame(i32),
}

type InitFn = unsafe extern "C" fn() -> c_int;
type ShutdownFn = unsafe extern "C" fn();
type SurfaceSizeChangedFn = unsafe extern "C" fn(c_uint, c_uint);
type ProcessFn = unsafe extern "C" fn() -> c_int;
type PointerEventFn = unsafe extern "C" fn(c_float, c_float, c_int);

/// Entry points resolved out of the loaded library. Resolution happens once
/// at load time, so a library missing any of them fails the whole load.
#[derive(Debug)]
struct EngineApi {
    initialize: InitFn,
    shutdown: ShutdownFn,
    surface_size_changed: SurfaceSizeChangedFn,
    process: ProcessFn,
    pointer_event: PointerEventFn,
}

/// Handle to the loaded engine library.
///
/// The library is never unloaded: its lifetime is the process lifetime, so
/// the resolved entry points stay valid for as long as the handle exists.
#[derive(Debug)]
pub struct Engine {
    api: EngineApi,
    #[allow(dead_code)]
    handle: *mut c_void,
}

// The handle is written once during single-threaded bootstrap and only read
// afterwards; the engine is driven from the main thread.
unsafe impl Send for Engine {}
unsafe impl Sync for Engine {}

impl Engine {
    fn open(name: &str) -> Result<Self, EngineError> {
        let file = library_filename(name);
        let path = CString::new(file.clone()).map_err(|_| EngineError::Load {
            name: name.to_string(),
            reason: "library name contains a NUL byte".to_string(),
        })?;

        // SAFETY: `path` is a valid C string. The engine's initialization
        // routines run under the platform loader's usual rules.
        let handle = unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(EngineError::Load {
                name: name.to_string(),
                reason: last_dl_error(),
            });
        }

        let initialize = find_symbol(handle, c"tess_initialize")?;
        let shutdown = find_symbol(handle, c"tess_shutdown")?;
        let surface_size_changed = find_symbol(handle, c"tess_surface_size_changed")?;
        let process = find_symbol(handle, c"tess_process")?;
        let pointer_event = find_symbol(handle, c"tess_pointer_event")?;

        // SAFETY: the engine exports these entry points with exactly these
        // signatures; the pointers were resolved from the handle kept alive
        // for the process lifetime.
        let api = unsafe {
            EngineApi {
                initialize: mem::transmute::<*mut c_void, InitFn>(initialize),
                shutdown: mem::transmute::<*mut c_void, ShutdownFn>(shutdown),
                surface_size_changed: mem::transmute::<*mut c_void, SurfaceSizeChangedFn>(
                    surface_size_changed,
                ),
                process: mem::transmute::<*mut c_void, ProcessFn>(process),
                pointer_event: mem::transmute::<*mut c_void, PointerEventFn>(pointer_event),
            }
        };

        info!("Loaded engine library {}", file);
        Ok(Self { api, handle })
    }

    pub fn initialize(&self) -> Result<(), EngineError> {
        // SAFETY: entry point resolved at load time from the live handle.
        let status = unsafe { (self.api.initialize)() };
        if status != 0 {
            return Err(EngineError::Init(status));
        }
        Ok(())
    }

    pub fn shutdown(&self) {
        // SAFETY: entry point resolved at load time from the live handle.
        unsafe { (self.api.shutdown)() }
    }

    pub fn surface_size_changed(&self, width: u32, height: u32) {
        // SAFETY: entry point resolved at load time from the live handle.
        unsafe { (self.api.surface_size_changed)(width, height) }
    }

    pub fn process(&self) -> Result<(), EngineError> {
        // SAFETY: entry point resolved at load time from the live handle.
        let status = unsafe { (self.api.process)() };
        if status != 0 {
            return Err(EngineError::Frame(status));
        }
        Ok(())
    }

    pub fn pointer_event(&self, x: f32, y: f32, pressed: bool) {
        // SAFETY: entry point resolved at load time from the live handle.
        unsafe { (self.api.pointer_event)(x, y, pressed as c_int) }
    }
}

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Load the engine library into the process.
///
/// Idempotent on success: repeated activity recreation within one process
/// reuses the already-loaded handle. A failed attempt leaves the guard
/// empty, so the caller sees the error instead of a half-initialized engine.
pub fn load() -> Result<&'static Engine, EngineError> {
    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }
    let engine = Engine::open(ENGINE_LIBRARY_NAME)?;
    Ok(ENGINE.get_or_init(|| engine))
}

/// The engine handle, if [`load`] has succeeded earlier in this process.
pub fn get() -> Option<&'static Engine> {
    ENGINE.get()
}

/// Expand a short library name the way the platform loader spells it.
pub fn library_filename(name: &str) -> String {
    if cfg!(target_vendor = "apple") {
        format!("lib{name}.dylib")
    } else {
        format!("lib{name}.so")
    }
}

fn find_symbol(handle: *mut c_void, symbol: &'static CStr) -> Result<*mut c_void, EngineError> {
    // Clear any stale error so a null result can be attributed correctly.
    // SAFETY: trivially safe.
    unsafe { libc::dlerror() };
    // SAFETY: `handle` is a live handle returned by dlopen and `symbol` is a
    // valid C string.
    let ptr = unsafe { libc::dlsym(handle, symbol.as_ptr()) };
    if ptr.is_null() {
        return Err(EngineError::Symbol {
            symbol: symbol.to_string_lossy().into_owned(),
            reason: last_dl_error(),
        });
    }
    Ok(ptr)
}

fn last_dl_error() -> String {
    // SAFETY: trivially safe.
    let error = unsafe { libc::dlerror() };
    if error.is_null() {
        return "unknown dl error".to_string();
    }
    // SAFETY: `error` is a pointer to a valid C string returned by dlerror().
    unsafe { CStr::from_ptr(error) }.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::{get, library_filename, load, Engine, EngineError};

    #[test]
    fn short_name_expands_to_platform_file_name() {
        let file = library_filename("tessellation");
        assert!(file.starts_with("lib"));
        assert!(file.ends_with(".so") || file.ends_with(".dylib"));
    }

    #[test]
    fn missing_library_reports_name_and_reason() {
        let err = Engine::open("definitely-not-a-real-engine").unwrap_err();
        match err {
            EngineError::Load { name, reason } => {
                assert_eq!(name, "definitely-not-a-real-engine");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failed_load_leaves_the_guard_empty() {
        // The fixed-name engine library is not present on test hosts; both
        // attempts must fail identically instead of caching the failure.
        assert!(load().is_err());
        assert!(get().is_none());
        assert!(load().is_err());
    }
}
