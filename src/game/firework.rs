use glam::{Vec3, Vec4};

use super::particle::{DrawSink, ExplosionParticle, ParticleInstance, ParticleKind, TrailParticle};
use super::random::RandomSampler;
use crate::config::{ValidConfig, ValueRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworkState {
    Rising,
    Exploded,
}

/// State change reported by [`Firework::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Exploded,
    Reset,
}

/// One firework slot: a rocket with its trail, then a burst, then a new rocket.
#[derive(Debug, Clone)]
pub struct Firework {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec4,
    pub scale: f32,
    pub state: FireworkState,
    /// Burst size, drawn at reset.
    pub num_particles: u32,
    trails: Vec<TrailParticle>,
    explosion: Vec<ExplosionParticle>,
}

impl Firework {
    pub fn new(config: &ValidConfig, rng: &mut RandomSampler) -> Self {
        let mut firework = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: Vec4::ONE,
            scale: 1.0,
            state: FireworkState::Rising,
            num_particles: 0,
            trails: Vec::with_capacity(config.trail_count as usize),
            explosion: Vec::with_capacity(config.particle_count.max as usize),
        };
        firework.reset(config, rng);
        firework
    }

    pub fn is_exploded(&self) -> bool {
        self.state == FireworkState::Exploded
    }

    /// Rocket trail; empty once exploded.
    pub fn trails(&self) -> &[TrailParticle] {
        &self.trails
    }

    /// Burst particles; empty while rising.
    pub fn explosion(&self) -> &[ExplosionParticle] {
        &self.explosion
    }

    /// Re-roll every random attribute and start a new rocket from the ground.
    pub fn reset(&mut self, config: &ValidConfig, rng: &mut RandomSampler) {
        self.explosion.clear();
        self.trails.clear();
        self.state = FireworkState::Rising;

        self.num_particles = rng.int(config.particle_count);
        self.position = Vec3::new(rng.real(ValueRange::new(0.0, config.world_width)), 0.0, 0.0);
        self.velocity = Vec3::new(
            rng.real(config.rocket_velocity_x),
            rng.real(config.rocket_velocity_y),
            0.0,
        );
        self.scale = rng.real(config.scale);
        self.color = rng.color(config.color_channel);

        for _ in 0..config.trail_count {
            let decay = rng.real(config.trail_decay_rate);
            let velocity = self.velocity * rng.real(config.rocket_trail_speed);
            self.trails.push(TrailParticle::new(
                self.position,
                velocity,
                self.color,
                config.trail_scale,
                decay,
            ));
        }
    }

    pub fn update(&mut self, dt: f32, config: &ValidConfig, rng: &mut RandomSampler) -> Option<Transition> {
        match self.state {
            FireworkState::Rising => self.update_rocket(dt, config, rng),
            FireworkState::Exploded => self.update_explosion(dt, config, rng),
        }
    }

    fn update_rocket(&mut self, dt: f32, config: &ValidConfig, rng: &mut RandomSampler) -> Option<Transition> {
        self.velocity += config.gravity * dt;
        self.position += self.velocity * dt;

        for trail in &mut self.trails {
            trail.update(dt, self.velocity, 1.0);
            if trail.is_spent() {
                let offset = rng.jitter(config.jitter);
                let velocity = self.velocity * rng.real(config.rocket_trail_speed);
                trail.respawn(self.position, offset, velocity);
            }
        }

        if self.velocity.y < 0.0 {
            self.explode(config, rng);
            return Some(Transition::Exploded);
        }
        None
    }

    fn update_explosion(&mut self, dt: f32, config: &ValidConfig, rng: &mut RandomSampler) -> Option<Transition> {
        let mut expired = false;
        for spark in &mut self.explosion {
            spark.update(dt, config, rng);
            // One spent spark ends the whole burst.
            if spark.is_spent() {
                expired = true;
                break;
            }
        }

        if expired {
            self.reset(config, rng);
            return Some(Transition::Reset);
        }
        None
    }

    fn explode(&mut self, config: &ValidConfig, rng: &mut RandomSampler) {
        self.trails.clear();
        self.explosion.clear();
        self.state = FireworkState::Exploded;

        for _ in 0..self.num_particles {
            let direction = rng.arc_direction(config.arc_vertices);
            let velocity = direction * rng.real(config.explosion_speed);
            let scale = rng.real(config.scale);
            self.explosion.push(ExplosionParticle::new(
                self.position,
                velocity,
                self.color,
                scale,
                config,
                rng,
            ));
        }
    }

    pub fn render(&self, sink: &mut impl DrawSink) {
        match self.state {
            FireworkState::Rising => {
                for trail in &self.trails {
                    sink.draw(ParticleKind::Trail, trail.particle.instance());
                }
                sink.draw(
                    ParticleKind::Rocket,
                    ParticleInstance::new(self.position, self.scale, self.color),
                );
            }
            FireworkState::Exploded => {
                for spark in &self.explosion {
                    spark.render(sink);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    fn launch(seed: u64) -> (ValidConfig, RandomSampler, Firework) {
        let config = ValidConfig::default();
        let mut rng = RandomSampler::seeded(seed);
        let firework = Firework::new(&config, &mut rng);
        (config, rng, firework)
    }

    fn exploded(seed: u64) -> (ValidConfig, RandomSampler, Firework) {
        let (config, mut rng, mut firework) = launch(seed);
        firework.velocity = Vec3::new(0.0, -1.0, 0.0);
        assert_eq!(firework.update(0.01, &config, &mut rng), Some(Transition::Exploded));
        (config, rng, firework)
    }

    #[test]
    fn new_firework_is_a_rising_rocket() {
        let (config, _, firework) = launch(1);

        assert_eq!(firework.state, FireworkState::Rising);
        assert_eq!(firework.trails().len(), config.trail_count as usize);
        assert!(firework.explosion().is_empty());
        assert!(config.particle_count.contains(firework.num_particles));
        assert_eq!(firework.position.y, 0.0);
        assert!((0.0..=config.world_width).contains(&firework.position.x));
        assert!(config.rocket_velocity_x.contains(firework.velocity.x));
        assert!(config.rocket_velocity_y.contains(firework.velocity.y));
        assert!(config.scale.contains(firework.scale));
        assert_eq!(firework.color.w, 1.0);
    }

    #[test]
    fn rocket_trails_start_at_the_rocket() {
        let (config, _, firework) = launch(2);
        for trail in firework.trails() {
            assert_eq!(trail.particle.position, firework.position);
            assert_eq!(trail.particle.color, firework.color);
            let factor = trail.particle.velocity.y / firework.velocity.y;
            assert!(factor >= 0.75 - 1e-5 && factor <= 1.0 + 1e-5);
            assert!(config.trail_decay_rate.contains(trail.decay_rate()));
        }
    }

    #[test]
    fn gravity_is_integrated_while_rising() {
        let (config, mut rng, mut firework) = launch(3);
        firework.position = Vec3::new(400.0, 0.0, 0.0);
        firework.velocity = Vec3::new(10.0, 400.0, 0.0);

        firework.update(0.1, &config, &mut rng);

        assert_eq!(firework.velocity, Vec3::new(10.0, 380.0, 0.0));
        assert_eq!(firework.position, Vec3::new(401.0, 38.0, 0.0));
    }

    #[test]
    fn apex_triggers_explosion() {
        let (config, mut rng, mut firework) = launch(4);
        firework.velocity = Vec3::new(0.0, 400.0, 0.0);
        let expected = firework.num_particles as usize;

        for _ in 0..20 {
            firework.update(0.1, &config, &mut rng);
        }
        assert!(firework.velocity.y <= 0.0);

        if !firework.is_exploded() {
            assert_eq!(firework.update(0.1, &config, &mut rng), Some(Transition::Exploded));
        }
        assert!(firework.is_exploded());
        assert!(firework.trails().is_empty());
        assert_eq!(firework.explosion().len(), expected);
    }

    #[test]
    fn burst_radiates_from_the_apex() {
        let (config, _, firework) = exploded(5);
        let step = TAU / config.arc_vertices as f32;

        for spark in firework.explosion() {
            assert_eq!(spark.particle.position, firework.position);
            assert_eq!(spark.particle.color, firework.color);
            assert!(config.scale.contains(spark.particle.scale));
            assert_eq!(spark.trails().len(), config.trail_count as usize);

            let velocity = spark.original_velocity();
            let speed = velocity.length();
            assert!(speed >= config.explosion_speed.min - 1e-3);
            assert!(speed <= config.explosion_speed.max + 1e-3);
            let angle = velocity.y.atan2(velocity.x).rem_euclid(TAU);
            let k = (angle / step).round();
            assert!((angle - k * step).abs() < 1e-3);
        }
    }

    #[test]
    fn rocket_trail_respawns_near_the_rocket() {
        let (config, mut rng, mut firework) = launch(6);
        firework.trails[0].particle.life = 0.0;

        firework.update(0.01, &config, &mut rng);

        let trail = &firework.trails()[0];
        let offset = trail.particle.position - firework.position;
        assert_eq!(trail.particle.life, 1.0);
        assert!(offset.x.abs() <= config.jitter + 1e-3);
        assert!((offset.x - offset.y).abs() < 1e-3);
        assert!((offset.y - offset.z).abs() < 1e-3);
        let factor = trail.particle.velocity.y / firework.velocity.y;
        assert!(factor >= 0.75 - 1e-5 && factor <= 1.0 + 1e-5);
    }

    #[test]
    fn one_spent_spark_resets_the_firework() {
        let (config, mut rng, mut firework) = exploded(7);
        firework.explosion[3].particle.life = 0.01;

        assert_eq!(firework.update(0.1, &config, &mut rng), Some(Transition::Reset));
        assert_eq!(firework.state, FireworkState::Rising);
        assert!(firework.explosion().is_empty());
        assert_eq!(firework.trails().len(), config.trail_count as usize);
        assert_eq!(firework.position.y, 0.0);
    }

    #[test]
    fn burst_fades_out_then_resets() {
        let (config, mut rng, mut firework) = exploded(8);
        let mut reset_after = None;
        for tick in 1..=40 {
            if firework.update(0.1, &config, &mut rng) == Some(Transition::Reset) {
                reset_after = Some(tick);
                break;
            }
            let alpha = firework.explosion()[0].particle.color.w;
            let life = firework.explosion()[0].particle.life;
            assert!((alpha - (life + config.explosion_decay_rate * 0.1)).abs() < 1e-5);
        }
        // Life 1.0 at 0.5 per second lasts about twenty ticks of 0.1s.
        let tick = reset_after.expect("burst never ended");
        assert!((20..=21).contains(&tick));
    }

    #[test]
    fn render_emits_the_active_set() {
        let (config, mut rng, mut firework) = launch(9);
        let mut drawn: Vec<(ParticleKind, ParticleInstance)> = Vec::new();
        firework.render(&mut drawn);

        assert_eq!(drawn.len(), config.trail_count as usize + 1);
        let (kind, rocket) = drawn.last().copied().unwrap();
        assert_eq!(kind, ParticleKind::Rocket);
        assert_eq!(rocket.position(), firework.position);
        assert_eq!(rocket.alpha(), 1.0);

        firework.velocity = Vec3::new(0.0, -1.0, 0.0);
        firework.update(0.01, &config, &mut rng);
        drawn.clear();
        firework.render(&mut drawn);

        let explosions = drawn.iter().filter(|(kind, _)| *kind == ParticleKind::Explosion).count();
        assert_eq!(explosions, firework.num_particles as usize);
        assert_eq!(drawn.len(), firework.num_particles as usize * (config.trail_count as usize + 1));
        assert!(drawn.iter().all(|(kind, _)| *kind != ParticleKind::Rocket));
    }
}
