//! Tick scheduling and measured rates for the two independent loops.
//!
//! The host runs updates ("cycles") and renders ("frames") at separate target
//! rates. Each loop gets a `TickSchedule` that says when the next tick is due
//! and a `RateMeter` that reports how fast ticks actually arrive, smoothed
//! over the last `RATE_SAMPLE_COUNT` intervals.

use std::time::{Duration, Instant};

const RATE_SAMPLE_COUNT: usize = 60;
const RESOLUTION_STEPS: usize = 16;
const RESOLUTION_BUDGET: Duration = Duration::from_millis(50);
const MAX_CLOCK_POLLS: usize = 10_000_000;

/// How far a schedule may fall behind before it is re-anchored instead of
/// replaying every missed tick.
pub const MAX_LAG: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct RateMeter {
    samples: [f64; RATE_SAMPLE_COUNT],
    sample_index: usize,
    last_tick: Option<Instant>,
    pub tick_count: u64,
    pub smoothed_hz: f64,
}

impl RateMeter {
    /// Seeds the average with `target_hz` so the first readings are sane.
    pub fn new(target_hz: f64) -> Self {
        let seed = if target_hz > 0.0 { 1.0 / target_hz } else { 0.0 };
        Self {
            samples: [seed; RATE_SAMPLE_COUNT],
            sample_index: 0,
            last_tick: None,
            tick_count: 0,
            smoothed_hz: target_hz.max(0.0),
        }
    }

    /// Record a tick at `now` and return the seconds since the previous one
    /// (zero for the first tick).
    pub fn tick(&mut self, now: Instant) -> f64 {
        self.tick_count += 1;
        let Some(last) = self.last_tick.replace(now) else {
            return 0.0;
        };
        let delta = now.saturating_duration_since(last).as_secs_f64();

        self.samples[self.sample_index] = delta;
        self.sample_index = (self.sample_index + 1) % RATE_SAMPLE_COUNT;
        let avg_dt: f64 = self.samples.iter().sum::<f64>() / RATE_SAMPLE_COUNT as f64;
        self.smoothed_hz = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        delta
    }

    pub fn rate(&self) -> f64 {
        self.smoothed_hz
    }
}

#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Instant,
}

impl TickSchedule {
    pub fn new(rate_hz: u32, now: Instant) -> Self {
        Self {
            interval: interval_for(rate_hz),
            next_due: now,
        }
    }

    pub fn set_rate(&mut self, rate_hz: u32) {
        self.interval = interval_for(rate_hz);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Consume one tick. Returns `false` when the schedule had fallen more
    /// than `MAX_LAG` behind and was re-anchored to `now`.
    pub fn advance(&mut self, now: Instant) -> bool {
        self.next_due += self.interval;
        if now.saturating_duration_since(self.next_due) > MAX_LAG {
            log::warn!(
                "Tick schedule fell {:.1}ms behind; skipping missed ticks",
                now.saturating_duration_since(self.next_due).as_secs_f64() * 1000.0
            );
            self.next_due = now + self.interval;
            return false;
        }
        true
    }
}

/// Smallest step `Instant` was seen to advance by, or `None` if it never
/// moved while sampling.
pub fn clock_resolution() -> Option<Duration> {
    let started = Instant::now();
    let mut smallest: Option<Duration> = None;
    let mut steps = 0;
    let mut previous = started;
    for _ in 0..MAX_CLOCK_POLLS {
        let now = Instant::now();
        if steps == RESOLUTION_STEPS || now.saturating_duration_since(started) > RESOLUTION_BUDGET {
            break;
        }
        let step = now.saturating_duration_since(previous);
        if !step.is_zero() {
            smallest = Some(smallest.map_or(step, |s| s.min(step)));
            steps += 1;
            previous = now;
        }
    }
    smallest
}

/// Clocks finer than a microsecond count as high resolution.
pub fn is_high_resolution(resolution: Duration) -> bool {
    resolution <= Duration::from_micros(1)
}

fn interval_for(rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_starts_at_target_rate() {
        let meter = RateMeter::new(60.0);
        assert!((meter.rate() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn first_tick_has_zero_delta() {
        let mut meter = RateMeter::new(30.0);
        assert_eq!(meter.tick(Instant::now()), 0.0);
        assert_eq!(meter.tick_count, 1);
    }

    #[test]
    fn meter_converges_on_actual_interval() {
        let mut meter = RateMeter::new(60.0);
        let start = Instant::now();
        for i in 0..=RATE_SAMPLE_COUNT as u64 {
            meter.tick(start + Duration::from_millis(20 * i));
        }
        assert!((meter.rate() - 50.0).abs() < 0.01, "rate {}", meter.rate());
    }

    #[test]
    fn delta_is_time_since_previous_tick() {
        let mut meter = RateMeter::new(60.0);
        let start = Instant::now();
        meter.tick(start);
        let delta = meter.tick(start + Duration::from_millis(40));
        assert!((delta - 0.040).abs() < 1e-9);
    }

    #[test]
    fn schedule_is_due_immediately_then_every_interval() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(50, start);
        assert!(schedule.is_due(start));
        assert!(schedule.advance(start));
        assert!(!schedule.is_due(start + Duration::from_millis(10)));
        assert!(schedule.is_due(start + Duration::from_millis(20)));
    }

    #[test]
    fn schedule_reanchors_after_large_stall() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(60, start);
        let late = start + Duration::from_secs(2);
        assert!(!schedule.advance(late));
        assert!(schedule.next_due() > late);
        assert!(!schedule.is_due(late));
    }

    #[test]
    fn rate_changes_take_effect() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(60, start);
        schedule.set_rate(120);
        assert!((schedule.interval().as_secs_f64() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn clock_resolution_is_measurable() {
        let resolution = clock_resolution().expect("Instant advances");
        assert!(resolution > Duration::ZERO);
        assert!(resolution < Duration::from_millis(100));
    }

    #[test]
    fn high_resolution_threshold() {
        assert!(is_high_resolution(Duration::from_nanos(100)));
        assert!(!is_high_resolution(Duration::from_millis(1)));
    }
}
