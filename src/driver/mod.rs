//! The frame loop shared by every scene.
//!
//! A [`SceneDriver`] owns the scene and its [`AnimationState`] and moves
//! through `Initializing → Running → Terminating`. Each running frame
//! advances the animation, draws the scene under the perspective camera,
//! then draws two overlay bands under a pixel-space orthographic
//! projection, restoring both transform stacks before presenting.

mod pacing;

use std::time::Instant;

use anyhow::Result;
use glam::{Vec2, Vec3};

use crate::math::{wrap_unit, Color};
use crate::overlay::{draw_gradient_rect, OverlayRect};
use crate::render::{FrameHost, MatrixMode, RenderBackend};
use crate::scene::{Scene, Spin};

pub use pacing::{Clock, FpsCounter, FramePacer};

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Hue phase increment per frame.
    pub hue_step: f32,
    pub overlay_height: f32,
    /// Overlay band width as a fraction of the window width.
    pub overlay_width_fraction: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: Color,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            hue_step: 0.002,
            overlay_height: 50.0,
            overlay_width_fraction: 0.9,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 50.0,
            clear_color: Color::BLACK,
        }
    }
}

/// Everything that changes from one frame to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    /// Accumulated rotation in degrees; how the two angles are used is up
    /// to the scene's [`Spin`].
    pub angles: Vec2,
    /// Always in [0, 1).
    pub hue_phase: f32,
}

impl AnimationState {
    pub fn advance(&mut self, spin: &Spin, hue_step: f32) {
        spin.advance(&mut self.angles);
        self.hue_phase = wrap_unit(self.hue_phase + hue_step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Initializing,
    Running,
    Terminating,
}

pub struct SceneDriver {
    config: DriverConfig,
    scene: Scene,
    animation: AnimationState,
    state: DriverState,
    frames_rendered: u64,
    clock: Clock,
    fps: FpsCounter,
}

impl SceneDriver {
    pub fn new(scene: Scene, config: DriverConfig) -> Self {
        Self {
            config,
            scene,
            animation: AnimationState::default(),
            state: DriverState::Initializing,
            frames_rendered: 0,
            clock: Clock::new(),
            fps: FpsCounter::new(),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Sets up the camera and uploads static geometry, then starts running.
    /// Does nothing outside the `Initializing` state.
    pub fn initialize<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if self.state != DriverState::Initializing {
            return;
        }

        self.reshape(backend);

        let transforms = backend.transforms();
        transforms.set_mode(MatrixMode::Model);
        transforms.load_identity();
        transforms.translate(Vec3::new(0.0, 0.0, -self.scene.camera_distance()));

        self.scene.prepare(backend);
        self.clock = Clock::new();
        self.state = DriverState::Running;

        let viewport = backend.viewport();
        log::info!(
            "Running '{}' at {}x{}",
            self.scene.title(),
            viewport.width,
            viewport.height
        );
    }

    /// Rebuilds the perspective projection for the backend's current size.
    pub fn reshape<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        let aspect = backend.viewport().aspect();
        let config = &self.config;

        let transforms = backend.transforms();
        let mode = transforms.mode();
        transforms.set_mode(MatrixMode::Projection);
        transforms.load_identity();
        transforms.perspective(config.fov_y_degrees, aspect, config.near, config.far);
        transforms.set_mode(mode);
    }

    /// Runs one complete frame. Does nothing unless running.
    pub fn frame<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        if self.state != DriverState::Running {
            return Ok(());
        }

        let spin = self.scene.spin();
        self.animation.advance(&spin, self.config.hue_step);

        backend.clear(self.config.clear_color);

        let transforms = backend.transforms();
        transforms.set_mode(MatrixMode::Model);
        transforms.push();
        spin.apply(self.animation.angles, transforms);
        self.scene.draw(backend);
        backend.transforms().pop();

        self.draw_overlay(backend);

        backend.present()?;
        self.frames_rendered += 1;

        if let Some(fps) = self.fps.tick(self.clock.tick()) {
            log::debug!("FPS: {:.1}", fps);
        }
        log::trace!(
            "frame {} hue {:.3} angles {:?}",
            self.frames_rendered,
            self.animation.hue_phase,
            self.animation.angles
        );

        Ok(())
    }

    fn draw_overlay<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        let viewport = backend.viewport();
        let (width, height) = (viewport.width as f32, viewport.height as f32);
        let band_height = self.config.overlay_height;
        let fraction = self.config.overlay_width_fraction;
        let phase = self.animation.hue_phase;

        backend.set_depth_test(false);

        let transforms = backend.transforms();
        transforms.set_mode(MatrixMode::Projection);
        transforms.push();
        transforms.load_identity();
        transforms.orthographic(0.0, width, height, 0.0, -1.0, 1.0);
        transforms.set_mode(MatrixMode::Model);
        transforms.push();
        transforms.load_identity();

        let top = OverlayRect::band(width, 0.0, fraction, band_height, phase);
        let bottom = OverlayRect::band(width, height - band_height, fraction, band_height, phase);
        draw_gradient_rect(backend, &top);
        draw_gradient_rect(backend, &bottom);

        let transforms = backend.transforms();
        transforms.pop();
        transforms.set_mode(MatrixMode::Projection);
        transforms.pop();
        transforms.set_mode(MatrixMode::Model);
    }

    /// Observed once per frame; the current frame, if any, still completes.
    pub fn request_close(&mut self) {
        if self.state != DriverState::Terminating {
            log::info!("Close requested after {} frames", self.frames_rendered);
            self.state = DriverState::Terminating;
        }
    }

    /// Drives `host` until it reports a close signal, pacing with `pacer`,
    /// then releases the host.
    pub fn run<H: FrameHost + ?Sized>(&mut self, host: &mut H, pacer: &mut FramePacer) -> Result<()> {
        self.initialize(host);

        while self.state == DriverState::Running {
            if host.poll_close() {
                self.request_close();
                break;
            }

            self.frame(host)?;
            pacer.wait();
        }

        self.terminate(host);
        Ok(())
    }

    pub fn terminate<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        self.state = DriverState::Terminating;
        host.release();
        log::info!(
            "Terminated after {} frames (hue phase {:.3})",
            self.frames_rendered,
            self.animation.hue_phase
        );
    }

    /// True when a paced loop should render a frame at `now`.
    pub fn frame_due(&self, pacer: &FramePacer, now: Instant) -> bool {
        self.state == DriverState::Running && pacer.is_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::create_cube;
    use crate::render::{RecordingBackend, Viewport};

    fn cube_driver() -> SceneDriver {
        SceneDriver::new(Scene::wireframe("cube", create_cube()), DriverConfig::default())
    }

    #[test]
    fn test_frame_before_initialize_is_ignored() {
        let mut driver = cube_driver();
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        driver.frame(&mut backend).unwrap();
        assert_eq!(driver.frames_rendered(), 0);
        assert_eq!(backend.frames_presented(), 0);
    }

    #[test]
    fn test_initialize_places_camera() {
        let mut driver = cube_driver();
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        driver.initialize(&mut backend);

        assert_eq!(driver.state(), DriverState::Running);
        let model = backend.transforms().model();
        assert_eq!(model.w_axis.z, -5.0);
    }

    #[test]
    fn test_frame_draws_scene_and_two_bands() {
        let mut driver = cube_driver();
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        driver.initialize(&mut backend);
        driver.frame(&mut backend).unwrap();

        // scene lines, then fill + border for each band
        let calls: Vec<_> = backend.draw_calls().collect();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[1].vertices.len(), 720 * 4);
        assert_eq!(calls[2].line_width, crate::overlay::BORDER_WIDTH);
        assert_eq!(calls[3].vertices[0].position, [40.0, 550.0, 0.0]);
    }

    #[test]
    fn test_close_moves_to_terminating() {
        let mut driver = cube_driver();
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        driver.initialize(&mut backend);
        driver.request_close();
        assert_eq!(driver.state(), DriverState::Terminating);

        driver.frame(&mut backend).unwrap();
        assert_eq!(driver.frames_rendered(), 0);
    }

    #[test]
    fn test_redraw_between_deadlines_is_not_due() {
        let mut driver = cube_driver();
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        let mut pacer = FramePacer::new(60);
        let start = pacer.next_frame();
        assert!(!driver.frame_due(&pacer, start));

        driver.initialize(&mut backend);
        assert!(driver.frame_due(&pacer, start));
        pacer.advance(start);

        let early = start + std::time::Duration::from_millis(5);
        assert!(!driver.frame_due(&pacer, early));
        assert!(driver.frame_due(&pacer, pacer.next_frame()));

        driver.request_close();
        assert!(!driver.frame_due(&pacer, pacer.next_frame()));
    }

    #[test]
    fn test_hue_phase_wraps() {
        let mut state = AnimationState {
            angles: Vec2::ZERO,
            hue_phase: 0.999,
        };
        let spin = Spin::PitchYaw { degrees_per_frame: 0.5 };
        state.advance(&spin, 0.002);
        assert!((state.hue_phase - 0.001).abs() < 1e-5);
    }
}
