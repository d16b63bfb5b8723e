use std::time::{Duration, Instant};

use tracing::info;

/// Turns wall-clock frame time into simulation steps.
///
/// Variable mode runs one step per frame with the measured delta. Fixed mode
/// accumulates frame time and runs as many fixed steps as fit.
pub struct GameLoop {
    last_update: Instant,
    accumulator: Duration,
    fixed_timestep: Option<Duration>,
    stats: FrameStats,
}

impl GameLoop {
    pub fn new(fixed_timestep: Option<f32>) -> Self {
        Self {
            last_update: Instant::now(),
            accumulator: Duration::ZERO,
            fixed_timestep: fixed_timestep.map(Duration::from_secs_f32),
            stats: FrameStats::default(),
        }
    }

    pub fn variable() -> Self {
        Self::new(None)
    }

    /// Restart timing from now, e.g. once the window is up.
    pub fn restart(&mut self) {
        self.last_update = Instant::now();
        self.accumulator = Duration::ZERO;
    }

    pub fn tick<F>(&mut self, update_fn: F) -> u32
    where
        F: FnMut(f32),
    {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_update);
        self.last_update = now;

        if let Some(ms_per_frame) = self.stats.record(frame_time) {
            info!("{ms_per_frame:.3} ms/frame");
        }

        self.advance(frame_time, update_fn)
    }

    /// Run the steps owed for `frame_time`; returns how many ran.
    pub fn advance<F>(&mut self, frame_time: Duration, mut update_fn: F) -> u32
    where
        F: FnMut(f32),
    {
        let Some(step) = self.fixed_timestep else {
            update_fn(frame_time.as_secs_f32());
            return 1;
        };

        self.accumulator += frame_time;
        let dt = step.as_secs_f32();
        let mut steps = 0;
        while self.accumulator >= step {
            update_fn(dt);
            self.accumulator -= step;
            steps += 1;
        }
        steps
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::variable()
    }
}

/// Average frame time over one-second windows.
#[derive(Default)]
pub struct FrameStats {
    frames: u32,
    elapsed: Duration,
}

impl FrameStats {
    /// Count a frame; once a full second has passed, return the mean ms/frame and start over.
    pub fn record(&mut self, frame_time: Duration) -> Option<f64> {
        self.frames += 1;
        self.elapsed += frame_time;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let ms_per_frame = self.elapsed.as_secs_f64() * 1000.0 / self.frames as f64;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(ms_per_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_mode_passes_frame_time_through() {
        let mut game_loop = GameLoop::variable();
        let mut seen = Vec::new();

        let steps = game_loop.advance(Duration::from_millis(25), |dt| seen.push(dt));

        assert_eq!(steps, 1);
        assert_eq!(seen, vec![0.025]);
    }

    #[test]
    fn fixed_mode_accumulates() {
        let mut game_loop = GameLoop::new(Some(0.01));
        let mut total = 0;

        total += game_loop.advance(Duration::from_millis(5), |_| {});
        assert_eq!(total, 0);
        total += game_loop.advance(Duration::from_millis(26), |dt| assert!((dt - 0.01).abs() < 1e-6));
        assert_eq!(total, 3);
    }

    #[test]
    fn stats_report_once_per_second() {
        let mut stats = FrameStats::default();
        for _ in 0..59 {
            assert_eq!(stats.record(Duration::from_micros(16_667)), None);
        }
        let ms = stats.record(Duration::from_micros(16_667)).unwrap();
        assert!((ms - 16.667).abs() < 1e-3);
        assert_eq!(stats.record(Duration::from_millis(16)), None);
    }
}
