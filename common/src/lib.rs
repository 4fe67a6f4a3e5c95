pub mod bounds;
pub mod points;

pub use bounds::Aabb;
pub use points::{InstanceSamples, Point, SampledScene};
