use jni::objects::{JObject, JValue};
use jni::sys::jint;
use jni::JavaVM;
use log::info;
use sparkles_macro::range_event_start;
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::platform::android::activity::AndroidApp;
use winit::platform::android::EventLoopBuilderExtAndroid;

use crate::config::WindowConfig;
use crate::engine;

/// Native side of the activity bootstrap: logging, the one-time engine
/// library load, window configuration, then the event loop hand-off.
///
/// The activity is fully created by the time this runs, so only its window
/// handles are touched here. Any failure on this path is fatal: a bootstrap
/// that cannot load the engine or reach the window has nothing to fall back
/// to.
pub fn bootstrap(app: AndroidApp, config: &WindowConfig) -> EventLoop<()> {
    let g = range_event_start!("android bootstrap");

    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );

    engine::load().expect("engine library load failed");

    configure_window(&app, config).expect("window configuration failed");

    drop(g);

    EventLoopBuilder::default()
        .with_android_app(app)
        .build()
        .unwrap()
}

fn configure_window(app: &AndroidApp, config: &WindowConfig) -> anyhow::Result<()> {
    let vm = unsafe { JavaVM::from_raw(app.vm_as_ptr() as _) }?;
    let mut env = vm.get_env()?;

    let activity = unsafe { JObject::from_raw(app.activity_as_ptr() as jni::sys::jobject) };

    let window = env
        .call_method(&activity, "getWindow", "()Landroid/view/Window;", &[])?
        .l()?;

    // Read-modify-write of the window attributes: let content extend into
    // the display cutout area.
    let layout_params = env
        .call_method(
            &window,
            "getAttributes",
            "()Landroid/view/WindowManager$LayoutParams;",
            &[],
        )?
        .l()?;
    env.set_field(
        &layout_params,
        "layoutInDisplayCutoutMode",
        "I",
        JValue::from(config.cutout_mode as jint),
    )?;
    env.call_method(
        &window,
        "setAttributes",
        "(Landroid/view/WindowManager$LayoutParams;)V",
        &[(&layout_params).into()],
    )?
    .v()?;

    let flags = config.ui_flags.bits() as jint;
    info!("Applying system UI visibility {:#x}", flags);
    let decor_view = env
        .call_method(&window, "getDecorView", "()Landroid/view/View;", &[])?
        .l()?;
    env.call_method(&decor_view, "setSystemUiVisibility", "(I)V", &[JValue::from(flags)])?
        .v()?;

    Ok(())
}
