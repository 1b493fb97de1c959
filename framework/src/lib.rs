//! Platform bootstrap for the tessellation demo: loads the native engine
//! library and configures the Android window before the event loop starts.

pub mod config;
pub mod engine;

#[cfg(target_os = "android")]
pub mod android;
