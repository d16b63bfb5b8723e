pub mod context;
pub mod mesh;
pub mod particles;
pub mod pipelines;
pub mod shaders;

pub use context::WgpuRenderer;
pub use particles::{world_view_proj, FireworkRenderer, InstanceBatch};
