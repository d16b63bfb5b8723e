use tracing::{debug, info};

use super::firework::{Firework, Transition};
use super::particle::DrawSink;
use super::random::RandomSampler;
use crate::config::{SimConfig, ValidConfig};
use crate::error::ConfigError;

/// Every firework slot, plus the configuration and random stream they share.
pub struct SimulationWorld {
    pub fireworks: Vec<Firework>,
    config: ValidConfig,
    rng: RandomSampler,
    pub time: f32,
}

impl SimulationWorld {
    /// Validate `config` and build an empty world.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let rng = RandomSampler::new(config.seed);
        Ok(Self {
            fireworks: Vec::new(),
            config,
            rng,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the firework set with `count` freshly launched rockets.
    pub fn initialize(&mut self, count: usize) {
        self.fireworks.clear();
        self.fireworks.reserve(count);
        for _ in 0..count {
            let firework = Firework::new(&self.config, &mut self.rng);
            self.fireworks.push(firework);
        }
        info!(
            count,
            seed = ?self.config.seed,
            "Initialized fireworks"
        );
    }

    /// Step every firework by the same `dt`.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;

        for (slot, firework) in self.fireworks.iter_mut().enumerate() {
            match firework.update(dt, &self.config, &mut self.rng) {
                Some(Transition::Exploded) => debug!(
                    slot,
                    particles = firework.num_particles,
                    x = firework.position.x,
                    y = firework.position.y,
                    "Firework exploded"
                ),
                Some(Transition::Reset) => debug!(slot, "Firework relaunched"),
                None => {}
            }
        }
    }

    pub fn render(&self, sink: &mut impl DrawSink) {
        for firework in &self.fireworks {
            firework.render(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueRange;
    use crate::game::particle::{ParticleInstance, ParticleKind};

    fn seeded_world(seed: u64) -> SimulationWorld {
        SimulationWorld::new(SimConfig { seed: Some(seed), ..Default::default() }).unwrap()
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = SimConfig {
            trail_decay_rate: ValueRange::new(6.0, 3.0),
            ..Default::default()
        };
        assert!(SimulationWorld::new(config).is_err());
    }

    #[test]
    fn initialize_populates_rockets() {
        let mut world = seeded_world(1);
        world.initialize(10);

        assert_eq!(world.fireworks.len(), 10);
        assert!(world.fireworks.iter().all(|f| !f.is_exploded()));

        world.initialize(3);
        assert_eq!(world.fireworks.len(), 3);
    }

    #[test]
    fn same_seed_same_show() {
        let mut a = seeded_world(21);
        let mut b = seeded_world(21);
        a.initialize(4);
        b.initialize(4);
        for _ in 0..300 {
            a.update(1.0 / 60.0);
            b.update(1.0 / 60.0);
        }

        let mut drawn_a: Vec<(ParticleKind, ParticleInstance)> = Vec::new();
        let mut drawn_b: Vec<(ParticleKind, ParticleInstance)> = Vec::new();
        a.render(&mut drawn_a);
        b.render(&mut drawn_b);
        assert_eq!(drawn_a, drawn_b);
    }

    #[test]
    fn render_does_not_mutate() {
        let mut world = seeded_world(2);
        world.initialize(5);
        world.update(0.5);

        let mut first: Vec<(ParticleKind, ParticleInstance)> = Vec::new();
        let mut second: Vec<(ParticleKind, ParticleInstance)> = Vec::new();
        world.render(&mut first);
        world.render(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn every_slot_cycles_back_to_a_rocket() {
        let mut world = seeded_world(3);
        world.initialize(6);

        let mut seen_exploded = vec![false; 6];
        let mut relaunched = vec![false; 6];
        // Rockets peak within 2.5s and bursts last 2s.
        for _ in 0..(60 * 6) {
            world.update(1.0 / 60.0);
            for (slot, firework) in world.fireworks.iter().enumerate() {
                if firework.is_exploded() {
                    seen_exploded[slot] = true;
                } else if seen_exploded[slot] {
                    relaunched[slot] = true;
                }
            }
        }
        assert!(relaunched.iter().all(|r| *r));
        assert!((world.time - 6.0).abs() < 1e-2);
    }
}
