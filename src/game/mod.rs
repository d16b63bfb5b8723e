pub mod firework;
pub mod particle;
pub mod random;
pub mod world;

pub use firework::{Firework, FireworkState, Transition};
pub use particle::{DrawSink, ExplosionParticle, Particle, ParticleInstance, ParticleKind, TrailParticle};
pub use random::RandomSampler;
pub use world::SimulationWorld;
