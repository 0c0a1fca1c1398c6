use std::thread;
use std::time::{Duration, Instant};

/// Tick metadata - carries tick number and timing info
#[derive(Debug, Clone, Copy)]
pub struct TickInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl TickInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite iterator that paces refresh ticks at a fixed rate.
/// Use this in a loop: `for tick in clock { ... }`
///
/// Stands in for the panel's frame interrupt when driving layers from a thread.
pub struct RefreshClock {
    tick_number: u64,
    period: Duration,
    start_time: Instant,
    last_tick_time: Instant,
    next_deadline: Instant,
}

impl RefreshClock {
    pub fn new(hz: u32) -> Self {
        let now = Instant::now();
        let period = Duration::from_secs(1) / hz.max(1);
        Self {
            tick_number: 0,
            period,
            start_time: now,
            last_tick_time: now,
            next_deadline: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tick_number(&self) -> u64 {
        self.tick_number
    }

    pub fn time(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

impl Iterator for RefreshClock {
    type Item = TickInfo;

    fn next(&mut self) -> Option<TickInfo> {
        let now = Instant::now();
        if let Some(wait) = self.next_deadline.checked_duration_since(now) {
            thread::sleep(wait);
        }
        // Late ticks restart the schedule instead of bursting to catch up
        let now = Instant::now();
        self.next_deadline = (self.next_deadline + self.period).max(now);

        let delta = now.duration_since(self.last_tick_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();
        let info = TickInfo::new(self.tick_number, time, delta);

        self.tick_number += 1;
        self.last_tick_time = now;

        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_is_clamped() {
        assert_eq!(RefreshClock::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn ticks_are_numbered_and_paced() {
        let clock = RefreshClock::new(200);
        let ticks: Vec<_> = clock.take(5).collect();
        assert_eq!(ticks.iter().map(|t| t.number).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        // Four full periods separate the first and last tick
        assert!(ticks[4].time - ticks[0].time >= 0.019);
    }
}
