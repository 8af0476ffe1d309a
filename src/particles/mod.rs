pub mod background;
pub mod color;
pub mod field;
pub mod scheduler;
pub mod surface;

pub use background::{ParticleBackground, ParticleEnvironment};
pub use color::{parse_hex_color, resolve_color, Rgb, Rgba};
pub use field::{connection_opacity, particle_count, Particle, ParticleField};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};
