//! Fixed-function style transform stacks.
//!
//! Two stacks (projection and model) whose top entries form the active
//! transform. Operations apply to the stack selected by [`MatrixMode`] and
//! post-multiply the top matrix, so the last transform issued is the first
//! one applied to a vertex.

use glam::{Mat4, Vec3};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixMode {
    Projection,
    Model,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransformStack {
    mode: MatrixMode,
    projection: Vec<Mat4>,
    model: Vec<Mat4>,
}

impl TransformStack {
    /// Both stacks hold a single identity matrix; model mode is active.
    pub fn new() -> Self {
        Self {
            mode: MatrixMode::Model,
            projection: vec![Mat4::IDENTITY],
            model: vec![Mat4::IDENTITY],
        }
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    fn active(&mut self) -> &mut Vec<Mat4> {
        match self.mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::Model => &mut self.model,
        }
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let stack = self.active();
        let last = stack.len() - 1;
        &mut stack[last]
    }

    /// Duplicates the top of the active stack.
    pub fn push(&mut self) {
        let stack = self.active();
        let top = stack[stack.len() - 1];
        stack.push(top);
    }

    /// Discards the top of the active stack. The base entry is never popped.
    pub fn pop(&mut self) {
        let mode = self.mode;
        let stack = self.active();
        debug_assert!(stack.len() > 1, "{:?} stack underflow", mode);
        if stack.len() > 1 {
            stack.pop();
        }
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::IDENTITY;
    }

    pub fn multiply(&mut self, matrix: Mat4) {
        let top = self.top_mut();
        *top = *top * matrix;
    }

    /// Perspective projection with a vertical field of view in degrees.
    pub fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.multiply(Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far));
    }

    pub fn orthographic(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.multiply(Mat4::orthographic_rh(left, right, bottom, top, near, far));
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    /// Rotation by `degrees` about `axis`; the axis need not be normalised.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.multiply(Mat4::from_axis_angle(axis, degrees.to_radians()));
    }

    pub fn projection(&self) -> Mat4 {
        self.projection[self.projection.len() - 1]
    }

    pub fn model(&self) -> Mat4 {
        self.model[self.model.len() - 1]
    }

    /// Projection × model: object space straight to clip space.
    pub fn combined(&self) -> Mat4 {
        self.projection() * self.model()
    }

    pub fn depth(&self, mode: MatrixMode) -> usize {
        match mode {
            MatrixMode::Projection => self.projection.len(),
            MatrixMode::Model => self.model.len(),
        }
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
