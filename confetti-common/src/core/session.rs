//! One continuous on-screen animation
//!
//! A session owns its surface and the live particles painted on it. It has
//! no notion of time; whoever drives it calls [`AnimationSession::step`] once
//! per display frame until it reports [`FrameOutcome::Complete`].

use super::particle::Particle;
use crate::paint::Surface;
use log::trace;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Particles remain, schedule another frame
    Continue,
    /// Every particle expired
    Complete,
}

pub struct AnimationSession<S: Surface> {
    surface: S,
    particles: Vec<Particle>,
    frames: u64,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl<S: Surface> AnimationSession<S> {
    pub fn new(surface: S, particles: Vec<Particle>) -> Self {
        Self {
            surface,
            particles,
            frames: 0,
            on_complete: None,
        }
    }

    /// Run `callback` once the session has finished and released its surface.
    pub fn with_on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Merge another burst into the running animation.
    pub fn add_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Clear the surface, then integrate and paint every live particle.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FrameOutcome {
        self.surface.clear();

        let surface = &mut self.surface;
        self.particles.retain_mut(|p| p.integrate(&mut *surface, &mut *rng));
        self.frames += 1;

        trace!(
            "confetti frame {}: {} particles alive",
            self.frames,
            self.particles.len()
        );

        if self.particles.is_empty() {
            FrameOutcome::Complete
        } else {
            FrameOutcome::Continue
        }
    }

    /// Release the surface and fire the completion callback.
    pub fn finish(mut self) {
        self.surface.release();
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }

    pub fn live(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames stepped so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
