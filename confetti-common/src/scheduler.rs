//! Frame scheduling
//!
//! Hosts supply the "run this before the next repaint" primitive. The
//! browser uses `requestAnimationFrame`; tests and the simulator use
//! [`QueuedScheduler`] and pump frames by hand.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type FrameCallback = Box<dyn FnOnce()>;

pub trait FrameScheduler {
    /// Run `callback` once, asynchronously, before the next display refresh.
    fn schedule_frame(&self, callback: FrameCallback);
}

/// Collects callbacks until the owner decides a frame has passed.
#[derive(Clone, Default)]
pub struct QueuedScheduler {
    pending: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run every callback that was pending when called. Callbacks they
    /// schedule wait for the next call, like a real refresh would.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }

    /// Pump frames until nothing is scheduled or `max_frames` have run.
    /// Returns the number of frames run.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.run_pending() > 0 {
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for QueuedScheduler {
    fn schedule_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}
