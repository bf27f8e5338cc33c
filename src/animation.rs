// Drives the particle field once per display refresh until cancelled.

use std::cell::Cell;
use std::rc::Rc;

use crate::field::ParticleField;
use crate::surface::{Bounds, Surface};

/// Shared stop flag. Cloning hands out another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Blocks (or yields) until the host is ready to paint the next frame.
/// Returns `false` once the host will never deliver another frame.
pub trait FrameScheduler {
    fn next_frame(&mut self) -> bool;
}

pub struct Animation<S: Surface> {
    field: ParticleField,
    surface: S,
    cancel: CancelHandle,
    frames: u64,
}

impl<S: Surface> Animation<S> {
    /// Samples a field sized to the surface.
    pub fn new(surface: S) -> Self {
        let field = ParticleField::new(surface.bounds());
        Animation::with_field(field, surface)
    }

    pub fn with_field(field: ParticleField, surface: S) -> Self {
        Animation {
            field,
            surface,
            cancel: CancelHandle::default(),
            frames: 0,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one tick. Returns `false` without drawing once cancelled.
    pub fn frame(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.field.tick(&mut self.surface);
        self.frames += 1;
        true
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.field.on_resize(bounds);
    }

    pub fn run<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        while scheduler.next_frame() && self.frame() {}
        log::info!("animation stopped after {} frames", self.frames);
    }
}
