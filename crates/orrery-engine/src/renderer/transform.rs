// renderer/transform.rs
//
// Per-frame transform stack: projection and view at the bottom, model
// matrices pushed per object through scopes that pop themselves on drop.
//
// Usage:
//   let mut stack = TransformStack::new(projection, view);
//   {
//       let scope = stack.push(model);
//       let world = scope.model();   // composed with every enclosing scope
//   }                                // popped here
//   stack.finish()?;                 // errors if a scope leaked

use glam::{Mat3, Mat4};
use std::ops::{Deref, DerefMut};

use crate::api::error::{OrreryError, OrreryResult};

/// Transform stack for one frame. Built at frame start, dropped at frame end.
#[derive(Debug)]
pub struct TransformStack {
    projection: Mat4,
    view: Mat4,
    /// Composed model matrices, one per open scope.
    models: Vec<Mat4>,
}

impl TransformStack {
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self {
            projection,
            view,
            models: Vec::with_capacity(8),
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Current composed model matrix (identity when no scope is open).
    pub fn model(&self) -> Mat4 {
        self.models.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Inverse-transpose of the current model's upper 3x3.
    pub fn normal(&self) -> Mat3 {
        normal_matrix(self.model())
    }

    pub fn depth(&self) -> usize {
        self.models.len()
    }

    /// Open a scope composing `local` onto the current model matrix.
    /// The matrix is popped when the returned scope is dropped.
    pub fn push(&mut self, local: Mat4) -> TransformScope<'_> {
        let base = self.models.len();
        let composed = self.model() * local;
        self.models.push(composed);
        TransformScope { stack: self, base }
    }

    /// Verify every scope was closed. A leftover matrix means a scope was
    /// leaked (e.g. `mem::forget`), which is a programming error.
    pub fn finish(self) -> OrreryResult<()> {
        if self.models.is_empty() {
            Ok(())
        } else {
            Err(OrreryError::TransformStackImbalance {
                depth: self.models.len(),
            })
        }
    }
}

/// Scoped model matrix. Derefs to the stack so scopes can nest.
#[derive(Debug)]
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
    base: usize,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        // Truncate rather than pop: also discards anything a leaked inner
        // scope left behind.
        self.stack.models.truncate(self.base);
    }
}

/// Normal matrix for a model matrix: inverse-transpose of its 3x3 part.
/// Falls back to the plain 3x3 for singular models.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(model);
    if m.determinant().abs() <= f32::EPSILON {
        m
    } else {
        m.inverse().transpose()
    }
}
