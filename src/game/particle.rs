use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use super::random::RandomSampler;
use crate::config::ValidConfig;

/// Which part of a firework a draw request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Rocket,
    Trail,
    Explosion,
}

/// Per-instance data for one circle: translation + uniform scale, and RGBA.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position_scale: [f32; 4],
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn new(position: Vec3, scale: f32, color: Vec4) -> Self {
        Self {
            position_scale: [position.x, position.y, position.z, scale],
            color: color.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position_scale[0], self.position_scale[1], self.position_scale[2])
    }

    pub fn scale(&self) -> f32 {
        self.position_scale[3]
    }

    pub fn alpha(&self) -> f32 {
        self.color[3]
    }
}

/// Receiver of draw requests produced by the render pass.
pub trait DrawSink {
    fn draw(&mut self, kind: ParticleKind, instance: ParticleInstance);
}

impl DrawSink for Vec<(ParticleKind, ParticleInstance)> {
    fn draw(&mut self, kind: ParticleKind, instance: ParticleInstance) {
        self.push((kind, instance));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec4,
    pub life: f32,
    pub scale: f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, color: Vec4, scale: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            life: 1.0,
            scale,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.life <= 0.0
    }

    /// A bare particle has no motion rule; only its owner moves it.
    pub fn update(&mut self, _dt: f32) {}

    pub fn instance(&self) -> ParticleInstance {
        ParticleInstance::new(self.position, self.scale, self.color)
    }

    fn sync_alpha(&mut self) {
        self.color.w = self.life;
    }

    /// Relocate next to `anchor`. The same scalar `offset` is added to every axis.
    fn respawn(&mut self, anchor: Vec3, offset: f32, velocity: Vec3) {
        self.position = anchor + Vec3::splat(offset);
        self.velocity = velocity;
        self.life = 1.0;
    }
}

/// A particle that follows a moving source and fades with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailParticle {
    pub particle: Particle,
    decay_rate: f32,
}

impl TrailParticle {
    pub fn new(position: Vec3, velocity: Vec3, color: Vec4, scale: f32, decay_rate: f32) -> Self {
        Self {
            particle: Particle::new(position, velocity, color, scale),
            decay_rate,
        }
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    pub fn is_spent(&self) -> bool {
        self.particle.is_spent()
    }

    /// Advance one tick behind a source moving at `source_velocity` with `source_life` left.
    pub fn update(&mut self, dt: f32, source_velocity: Vec3, source_life: f32) {
        let p = &mut self.particle;
        p.velocity = source_velocity;
        // Own life scales the step so fading trails fall behind.
        p.position += p.life * p.velocity * dt;
        if p.life > source_life {
            p.life = source_life;
        }
        p.sync_alpha();
        p.life -= self.decay_rate * dt;
    }

    pub fn respawn(&mut self, anchor: Vec3, offset: f32, velocity: Vec3) {
        self.particle.respawn(anchor, offset, velocity);
    }
}

/// A burst particle with its own group of trails.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionParticle {
    pub particle: Particle,
    original_velocity: Vec3,
    trails: Vec<TrailParticle>,
}

impl ExplosionParticle {
    pub fn new(
        position: Vec3,
        velocity: Vec3,
        color: Vec4,
        scale: f32,
        config: &ValidConfig,
        rng: &mut RandomSampler,
    ) -> Self {
        let trail_velocity = velocity * config.explosion_trail_speed;
        let trails = (0..config.trail_count)
            .map(|_| {
                let decay = rng.real(config.trail_decay_rate);
                TrailParticle::new(position, trail_velocity, color, config.trail_scale, decay)
            })
            .collect();

        Self {
            particle: Particle::new(position, velocity, color, scale),
            original_velocity: velocity,
            trails,
        }
    }

    pub fn original_velocity(&self) -> Vec3 {
        self.original_velocity
    }

    pub fn trails(&self) -> &[TrailParticle] {
        &self.trails
    }

    pub fn is_spent(&self) -> bool {
        self.particle.is_spent()
    }

    pub fn update(&mut self, dt: f32, config: &ValidConfig, rng: &mut RandomSampler) {
        // Trails see this particle as it was at the start of the tick.
        let source_velocity = self.particle.velocity;
        let source_life = self.particle.life;
        for trail in &mut self.trails {
            trail.update(dt, source_velocity, source_life);
            if trail.is_spent() {
                let offset = rng.jitter(config.jitter);
                trail.respawn(
                    self.particle.position,
                    offset,
                    self.particle.velocity * config.explosion_trail_speed,
                );
            }
        }

        let p = &mut self.particle;
        // Displacement for this tick, shrinking with life; not kinematic integration.
        p.velocity = p.life * self.original_velocity * dt;
        p.position += p.velocity;
        p.sync_alpha();
        p.life -= config.explosion_decay_rate * dt;
    }

    pub fn render(&self, sink: &mut impl DrawSink) {
        for trail in &self.trails {
            sink.draw(ParticleKind::Trail, trail.particle.instance());
        }
        sink.draw(ParticleKind::Explosion, self.particle.instance());
    }
}
