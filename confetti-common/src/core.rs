pub type Point = nalgebra::Point2<f64>;
pub type Vector = nalgebra::Vector2<f64>;

/// Downward drift added to every particle each tick, in pixels.
pub const GRAVITY: f64 = 3.0;

mod color;
pub use color::{colors, parse_color, FillStyle, Rgb};

mod options;
pub use options::{BurstConfig, ConfettiOptions, OriginOptions};

mod particle;
pub use particle::Particle;

mod session;
pub use session::{AnimationSession, FrameOutcome};
