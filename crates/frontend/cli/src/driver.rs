//! Fixed-timestep execution driver.
//!
//! Wall-clock time accumulates in a [`FramePacer`]; every whole frame
//! interval in the accumulator buys one `step()`. Whatever is left of the
//! current frame is slept off.

use std::thread;
use std::time::{Duration, Instant};

use sm83_core::Cpu;

/// Steps per second when nothing else is configured.
pub const DEFAULT_FPS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub fps: u32,
    /// Stop cleanly after this many steps.
    pub max_steps: Option<u64>,
    /// Run steps back-to-back instead of pacing them.
    pub unpaced: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            max_steps: None,
            unpaced: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    accumulator: Duration,
}

impl FramePacer {
    /// `fps` of 0 is treated as 1.
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Add `elapsed` and return how many frames are now due. The remainder
    /// stays in the accumulator.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        self.accumulator += elapsed;
        let mut due = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            due += 1;
        }
        due
    }

    /// Time left until the next frame is due.
    pub fn until_next(&self) -> Duration {
        self.interval.saturating_sub(self.accumulator)
    }
}

/// Step `cpu` until `max_steps` is reached or a step fails. Returns the
/// number of steps taken. Without a step limit this only returns on error.
pub fn run<C: Cpu>(cpu: &mut C, config: &DriverConfig) -> Result<u64, C::Error> {
    let limit = config.max_steps.unwrap_or(u64::MAX);
    let mut steps = 0u64;

    if config.unpaced {
        while steps < limit {
            cpu.step()?;
            steps += 1;
        }
        return Ok(steps);
    }

    let mut pacer = FramePacer::new(config.fps);
    log::debug!(
        "pacing at {} steps/s ({:?} per frame)",
        config.fps.max(1),
        pacer.interval()
    );
    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let due = pacer.advance(now - last);
        last = now;
        if due > 1 {
            log::trace!("{} frames due, {:?} carried", due, pacer.accumulator());
        }

        for _ in 0..due {
            if steps >= limit {
                return Ok(steps);
            }
            cpu.step()?;
            steps += 1;
        }
        if steps >= limit {
            return Ok(steps);
        }

        let sleep = pacer.until_next().saturating_sub(now.elapsed());
        if !sleep.is_zero() {
            thread::sleep(sleep);
        }
    }
}
