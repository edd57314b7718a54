//! Entry points that drive a [`SceneDriver`]: windowed, with a winit event
//! loop and a [`GpuBackend`], or headless against a [`RecordingBackend`].

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::driver::{AnimationState, DriverState, FramePacer, SceneDriver};
use crate::render::{GpuBackend, RecordingBackend, Viewport};

struct App {
    driver: SceneDriver,
    pacer: FramePacer,
    window: Option<Arc<Window>>,
    backend: Option<GpuBackend>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(driver: SceneDriver) -> Self {
        let pacer = FramePacer::new(driver.config().fps);
        Self {
            driver,
            pacer,
            window: None,
            backend: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.request_close();
        if let Some(mut backend) = self.backend.take() {
            self.driver.terminate(&mut backend);
        }
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.driver.state() != DriverState::Initializing {
            return;
        }

        let config = self.driver.config();
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.driver.scene().title())
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, anyhow!("Failed to create window: {}", e));
                return;
            }
        };

        let mut backend = match pollster::block_on(GpuBackend::new(window.clone())) {
            Ok(backend) => backend,
            Err(e) => {
                self.fail(event_loop, e.context("Failed to initialize GPU backend"));
                return;
            }
        };

        self.driver.initialize(&mut backend);
        self.pacer = FramePacer::new(self.driver.config().fps);
        self.window = Some(window);
        self.backend = Some(backend);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(backend) = &mut self.backend {
                    backend.resize(size.width, size.height);
                    self.driver.reshape(backend);
                }
            }
            WindowEvent::RedrawRequested => {
                // Expose and resize redraws arrive off schedule; the animation
                // only steps on paced frames.
                let now = Instant::now();
                if !self.driver.frame_due(&self.pacer, now) {
                    return;
                }
                if let Some(backend) = &mut self.backend {
                    if let Err(e) = self.driver.frame(backend) {
                        log::error!("Render error: {:#}", e);
                    }
                    self.pacer.advance(now);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        if self.driver.frame_due(&self.pacer, Instant::now()) {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.next_frame()));
    }
}

/// Opens the window and runs `driver` until the user closes it.
pub fn run(driver: SceneDriver) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(driver);

    event_loop
        .run_app(&mut app)
        .context("Event loop exited with an error")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Runs `frames` unpaced frames with no window and returns the final
/// animation state.
pub fn run_headless(mut driver: SceneDriver, frames: u64) -> Result<AnimationState> {
    let config = driver.config();
    let mut backend =
        RecordingBackend::new(Viewport::new(config.width, config.height)).close_after(frames);

    driver.run(&mut backend, &mut FramePacer::unpaced())?;

    let animation = driver.animation();
    log::info!(
        "Headless run finished: {} frames, hue phase {:.4}, angles {:?}",
        driver.frames_rendered(),
        animation.hue_phase,
        animation.angles
    );
    Ok(animation)
}
