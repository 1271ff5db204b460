//! Polled interval timers.
//!
//! Timers never block and never call back on their own: the owner polls them
//! once per tick with the elapsed milliseconds. A stopped timer ignores
//! updates, so nothing fires after [`Timer::stop`] returns. Every timer
//! repeats until stopped.

#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    name: &'static str,
    interval_ms: u32,
    elapsed_ms: u32,
    running: bool,
    acceleration: f32,
}

impl Timer {
    /// A stopped, repeating timer
    pub fn new(name: &'static str, interval_ms: u32) -> Self {
        Self {
            name,
            interval_ms,
            elapsed_ms: 0,
            running: false,
            acceleration: 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Factor > 1 shortens the interval; non-positive factors are ignored
    pub fn set_acceleration(&mut self, factor: f32) {
        if factor > 0.0 {
            self.acceleration = factor;
        }
    }

    pub fn reset_acceleration(&mut self) {
        self.acceleration = 1.0;
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Base interval divided by the acceleration factor
    pub fn current_interval(&self) -> u32 {
        (self.interval_ms as f32 / self.acceleration) as u32
    }

    /// Advance time without firing
    pub fn accumulate(&mut self, elapsed_ms: u32) {
        if self.running {
            self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        }
    }

    /// Advance time; returns true when the interval has been reached.
    ///
    /// Firing resets the accumulator.
    pub fn update(&mut self, elapsed_ms: u32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < self.current_interval() {
            return false;
        }
        self.elapsed_ms = 0;
        true
    }
}
