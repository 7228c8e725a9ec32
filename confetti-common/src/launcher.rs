//! Burst launcher
//!
//! Holds the "current animation" slot. The first burst creates a surface and
//! starts a frame loop; bursts that arrive while it runs are merged into it,
//! so concurrent calls share one surface and one loop. The slot is cleared
//! the frame the last particle expires.

use crate::core::{AnimationSession, BurstConfig, ConfettiOptions, FrameOutcome, Particle};
use crate::paint::{Surface, SurfaceProvider};
use crate::scheduler::FrameScheduler;
use crate::Result;
use anyhow::Context;
use log::debug;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

type CompletionHook = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

struct Shared<P: SurfaceProvider, F, R> {
    provider: P,
    scheduler: F,
    rng: RefCell<R>,
    active: RefCell<Option<AnimationSession<P::Surface>>>,
}

/// Launches bursts onto surfaces from `P`, driven by frames from `F`.
///
/// Cloning yields another handle to the same slot.
pub struct Launcher<P: SurfaceProvider, F, R> {
    shared: Rc<Shared<P, F, R>>,
    on_complete: CompletionHook,
}

impl<P: SurfaceProvider, F, R> Clone for Launcher<P, F, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            on_complete: Rc::clone(&self.on_complete),
        }
    }
}

impl<P, F, R> Launcher<P, F, R>
where
    P: SurfaceProvider + 'static,
    F: FrameScheduler + 'static,
    R: Rng + 'static,
{
    pub fn new(provider: P, scheduler: F, rng: R) -> Self {
        Self {
            shared: Rc::new(Shared {
                provider,
                scheduler,
                rng: RefCell::new(rng),
                active: RefCell::new(None),
            }),
            on_complete: Rc::new(RefCell::new(None)),
        }
    }

    /// Called every time a running animation ends and its surface is gone.
    pub fn set_on_complete(&self, hook: impl FnMut() + 'static) {
        *self.on_complete.borrow_mut() = Some(Box::new(hook));
    }

    pub fn launch(&self, options: &ConfettiOptions) -> Result<()> {
        self.launch_config(&options.resolve())
    }

    /// Fire one burst. Merges into the running animation if there is one.
    pub fn launch_config(&self, config: &BurstConfig) -> Result<()> {
        if let Some(session) = self.shared.active.borrow_mut().as_mut() {
            let surface = session.surface();
            let particles = self.burst(config, surface.width(), surface.height());
            debug!(
                "confetti: merging {} particles into running animation ({} live)",
                particles.len(),
                session.live()
            );
            session.add_particles(particles);
            return Ok(());
        }

        let surface = self
            .shared
            .provider
            .create_surface(config.z_index)
            .context("failed to create confetti surface")?;
        let particles = self.burst(config, surface.width(), surface.height());
        self.start(surface, particles);
        Ok(())
    }

    /// Build the particles of one burst for a `width` x `height` surface.
    fn burst(&self, config: &BurstConfig, width: u32, height: u32) -> Vec<Particle> {
        let origin = config.pixel_origin(width, height);
        let mut rng = self.shared.rng.borrow_mut();
        (0..config.particle_count)
            .rev()
            .map(|i| Particle::new(origin, config, config.color_for(i), &mut *rng))
            .collect()
    }

    fn start(&self, surface: P::Surface, particles: Vec<Particle>) {
        debug!(
            "confetti: starting animation on {}x{} surface with {} particles",
            surface.width(),
            surface.height(),
            particles.len()
        );

        let hook = Rc::clone(&self.on_complete);
        let session = AnimationSession::new(surface, particles).with_on_complete(move || {
            // Unborrowed while it runs, the hook may replace itself
            let taken = hook.borrow_mut().take();
            if let Some(mut callback) = taken {
                callback();
                let mut slot = hook.borrow_mut();
                if slot.is_none() {
                    *slot = Some(callback);
                }
            }
        });

        let mut active = self.shared.active.borrow_mut();
        debug_assert!(active.is_none(), "an animation is already running");
        *active = Some(session);
        drop(active);

        Self::schedule(&self.shared);
    }

    fn schedule(shared: &Rc<Shared<P, F, R>>) {
        let next = Rc::clone(shared);
        shared
            .scheduler
            .schedule_frame(Box::new(move || Self::frame(&next)));
    }

    fn frame(shared: &Rc<Shared<P, F, R>>) {
        let outcome = {
            let mut active = shared.active.borrow_mut();
            let Some(session) = active.as_mut() else {
                return;
            };
            let mut rng = shared.rng.borrow_mut();
            session.step(&mut *rng)
        };

        match outcome {
            FrameOutcome::Continue => Self::schedule(shared),
            FrameOutcome::Complete => {
                // Out of the slot before finishing, the hook may launch again
                let finished = shared.active.borrow_mut().take();
                if let Some(session) = finished {
                    debug!("confetti: animation finished after {} frames", session.frames());
                    session.finish();
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.active.borrow().is_some()
    }

    /// Particles alive in the running animation, 0 when idle.
    pub fn live_particles(&self) -> usize {
        self.shared.active.borrow().as_ref().map_or(0, |s| s.live())
    }

    /// Frames stepped by the running animation, 0 when idle.
    pub fn frames(&self) -> u64 {
        self.shared.active.borrow().as_ref().map_or(0, |s| s.frames())
    }
}
