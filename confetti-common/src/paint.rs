//! Drawing surfaces
//!
//! The animation only needs two drawing primitives, so hosts implement
//! [`PaintContext`] over whatever they render to. [`RecordingProvider`] is the
//! headless implementation used by tests and the simulator.

use crate::core::{FillStyle, Point};
use crate::Result;
use std::cell::RefCell;
use std::rc::Rc;

pub trait PaintContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill the closed polygon through `points`, in order.
    fn fill_polygon(&mut self, points: &[Point], style: FillStyle);
}

/// A paint context with a fixed pixel size that can be taken off screen.
pub trait Surface: PaintContext {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn clear(&mut self) {
        let (width, height) = (self.width() as f64, self.height() as f64);
        self.clear_rect(0.0, 0.0, width, height);
    }

    /// Detach from the display. Called once, when the animation ends.
    fn release(&mut self);
}

pub trait SurfaceProvider {
    type Surface: Surface;

    fn create_surface(&self, z_index: i32) -> Result<Self::Surface>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    Clear {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Fill {
        points: Vec<Point>,
        style: FillStyle,
    },
}

/// Everything the surfaces of one [`RecordingProvider`] did.
#[derive(Debug, Default)]
pub struct PaintLog {
    pub created: usize,
    pub released: usize,
    pub last_z_index: Option<i32>,
    /// Number of `clear_rect` calls, one per animation frame.
    pub clears: usize,
    pub fills: usize,
    /// Full command history, only kept when recording is enabled
    pub commands: Vec<PaintCommand>,
}

/// Hands out in-memory surfaces of a fixed size that share one [`PaintLog`].
#[derive(Clone)]
pub struct RecordingProvider {
    width: u32,
    height: u32,
    record: bool,
    log: Rc<RefCell<PaintLog>>,
}

impl RecordingProvider {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            record: true,
            log: Rc::new(RefCell::new(PaintLog::default())),
        }
    }

    /// Only count commands instead of storing them.
    pub fn counting_only(mut self) -> Self {
        self.record = false;
        self
    }

    pub fn log(&self) -> std::cell::Ref<'_, PaintLog> {
        self.log.borrow()
    }

    /// Drain the recorded command history.
    pub fn take_commands(&self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.log.borrow_mut().commands)
    }
}

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn create_surface(&self, z_index: i32) -> Result<RecordingSurface> {
        let mut log = self.log.borrow_mut();
        log.created += 1;
        log.last_z_index = Some(z_index);
        Ok(RecordingSurface {
            width: self.width,
            height: self.height,
            record: self.record,
            released: false,
            log: Rc::clone(&self.log),
        })
    }
}

pub struct RecordingSurface {
    width: u32,
    height: u32,
    record: bool,
    released: bool,
    log: Rc<RefCell<PaintLog>>,
}

impl PaintContext for RecordingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        if self.record {
            log.commands.push(PaintCommand::Clear {
                x,
                y,
                width,
                height,
            });
        }
    }

    fn fill_polygon(&mut self, points: &[Point], style: FillStyle) {
        let mut log = self.log.borrow_mut();
        log.fills += 1;
        if self.record {
            log.commands.push(PaintCommand::Fill {
                points: points.to_vec(),
                style,
            });
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.log.borrow_mut().released += 1;
        }
    }
}
