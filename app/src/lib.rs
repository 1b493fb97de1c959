use std::sync::atomic::AtomicBool;

pub mod winit;

static FIRST_RUN: AtomicBool = AtomicBool::new(true);

// The loader may re-enter android_main if the activity is recreated inside a
// live process; the engine and window state only support one run per process.
#[cfg(target_os = "android")]
#[no_mangle]
fn android_main(app: crate::winit::AndroidApp) {
    use crate::winit::run_android;
    if !FIRST_RUN.swap(false, std::sync::atomic::Ordering::SeqCst) {
        std::process::exit(0);
    }
    run_android(app);
    std::process::exit(0);
}
