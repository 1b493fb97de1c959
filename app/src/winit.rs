use std::time::Instant;

use log::{error, info, warn};
use sparkles::FinalizeGuard;
use sparkles_macro::{instant_event, range_event_start};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{self, NamedKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};
#[cfg(target_os = "android")]
pub use winit::platform::android::activity::AndroidApp;

use tessellation_framework::engine::{self, Engine};

#[cfg(target_os = "android")]
pub fn run_android(app: AndroidApp) {
    use tessellation_framework::android;
    use tessellation_framework::config::WindowConfig;

    let event_loop = android::bootstrap(app, &WindowConfig::default());
    let mut winit_app = WinitApp::new();
    event_loop.run_app(&mut winit_app).unwrap();
}

#[cfg(not(target_os = "android"))]
pub fn run() {
    engine::load().expect("engine library load failed");

    let event_loop = EventLoop::new().unwrap();
    let mut winit_app = WinitApp::new();
    event_loop.run_app(&mut winit_app).unwrap();
}

struct WinitApp {
    app_state: Option<AppState>,
    g: FinalizeGuard,
}

impl WinitApp {
    fn new() -> Self {
        let g = sparkles::init_default();
        Self { app_state: None, g }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let g = range_event_start!("[WINIT] resumed");
        info!("\t\t*** APP RESUMED ***");
        // A resume with a live session means the surface was recreated:
        // tear the old session down before starting over.
        if let Some(state) = self.app_state.take() {
            drop(state);
        }
        let window = event_loop
            .create_window(WindowAttributes::default().with_title("Tessellation"))
            .unwrap();

        let app_state = AppState::new_winit(window);
        self.app_state = Some(app_state);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        let g = range_event_start!("[WINIT] suspended");
        info!("\t\t*** APP SUSPENDED ***");
        if let Some(state) = self.app_state.take() {
            drop(state);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let g = range_event_start!("[WINIT] window event");
        let Some(app_state) = self.app_state.as_mut() else {
            return;
        };
        if app_state.is_finished() {
            info!("Exit requested!");
            event_loop.exit();
            return;
        }
        if let Err(e) = app_state.handle_event(event_loop, event) {
            error!("Error handling event: {:?}", e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let g = range_event_start!("[WINIT] Exiting");
        info!("\t\t*** APP EXITING ***");
        if let Some(state) = self.app_state.take() {
            drop(state);
        }
    }

    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        let g = range_event_start!("[WINIT] Memory warning");
        info!("\t\t*** APP MEMORY WARNING ***");
    }
}

pub struct AppState {
    app_finished: bool,

    engine: &'static Engine,
    window: Window,

    cursor_pos: (f32, f32),

    frame_cnt: i32,
    last_sec: Instant,

    rendering_active: bool,
}

impl AppState {
    pub fn new_winit(window: Window) -> AppState {
        let engine = engine::get().expect("engine library is loaded before the event loop starts");
        engine.initialize().expect("engine initialization failed");

        let inner_size = window.inner_size();
        engine.surface_size_changed(inner_size.width, inner_size.height);
        window.request_redraw();

        Self {
            app_finished: false,

            engine,
            window,

            cursor_pos: (0.0, 0.0),

            last_sec: Instant::now(),
            frame_cnt: 0,

            rendering_active: true,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.app_finished
    }

    pub fn handle_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        evt: WindowEvent,
    ) -> anyhow::Result<()> {
        match &evt {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        logical_key: keyboard::Key::Named(NamedKey::GoBack | NamedKey::BrowserBack),
                        state: winit::event::ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let g = range_event_start!("[APP] Close requested");
                info!("Close requested...");
                self.app_finished = true;
            }

            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        logical_key: keyboard::Key::Named(NamedKey::F11),
                        state: winit::event::ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if self.window.fullscreen().is_none() {
                    let g = range_event_start!("[APP] Enable fullscreen");
                    self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                } else {
                    let g = range_event_start!("[APP] Exit fullscreen mode");
                    self.window.set_fullscreen(None);
                }
            }

            WindowEvent::Touch(t) => {
                let g = range_event_start!("[APP] Touch event");
                info!("Touch event: {:?}", t);
                let pressed = matches!(t.phase, TouchPhase::Started | TouchPhase::Moved);
                self.engine
                    .pointer_event(t.location.x as f32, t.location.y as f32, pressed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = (position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor_pos;
                self.engine.pointer_event(x, y, *state == ElementState::Pressed);
            }

            WindowEvent::RedrawRequested => {
                let g = range_event_start!("[APP] Redraw requested");
                if !self.app_finished && self.rendering_active {
                    self.engine.process()?;

                    self.frame_cnt += 1;
                    if self.last_sec.elapsed().as_secs() >= 1 {
                        instant_event!("[APP] New sec!");
                        sparkles::flush_thread_local();

                        info!("FPS: {}", self.frame_cnt);
                        self.frame_cnt = 0;
                        self.last_sec = Instant::now();
                    }
                    let g = range_event_start!("[APP] window.request_redraw call");
                    self.window.request_redraw();
                }
            }

            WindowEvent::Resized(size) => {
                info!("Resized to {}x{}", size.width, size.height);
                if size.width == 0 || size.height == 0 {
                    warn!("One of dimensions is 0! Suspending rendering...");
                    self.rendering_active = false;
                } else {
                    if !self.rendering_active {
                        info!("Continue rendering...");
                    }
                    self.engine.surface_size_changed(size.width, size.height);
                    self.rendering_active = true;
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        info!("Shutting engine down...");
        self.engine.shutdown();
    }
}
