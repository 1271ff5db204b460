//! Simulation frame counter, independent of wall time.

use std::fmt;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::types::DEFAULT_FPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameClock {
    frame_count: u64,
    fps: u32,
}

impl FrameClock {
    /// A clock at frame 0; an fps of 0 is treated as 1.
    pub fn new(fps: u32) -> Self {
        Self::with_frames(0, fps)
    }

    pub fn with_frames(frame_count: u64, fps: u32) -> Self {
        Self {
            frame_count,
            fps: fps.max(1),
        }
    }

    pub fn tick(&mut self) {
        self.frame_count += 1;
    }

    pub fn reset(&mut self) {
        self.frame_count = 0;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Whole seconds simulated (truncating)
    pub fn total_seconds(&self) -> u64 {
        self.frame_count / self.fps as u64
    }

    pub fn hours(&self) -> u64 {
        self.total_seconds() / 3600 % 24
    }

    pub fn minutes(&self) -> u64 {
        self.total_seconds() / 60 % 60
    }

    pub fn seconds(&self) -> u64 {
        self.total_seconds() % 60
    }

    /// `SS`, `MM:SS` or `HH:MM:SS`, dropping leading zero groups
    pub fn time_parts(&self) -> String {
        let (h, m, s) = (self.hours(), self.minutes(), self.seconds());
        if h > 0 {
            format!("{h:02}:{m:02}:{s:02}")
        } else if m > 0 {
            format!("{m:02}:{s:02}")
        } else {
            format!("{s:02}")
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.time_parts())
    }
}

/// Wall-clock `YYYY-MM-DD HH:MM:SS` used to stamp a game's start.
///
/// Local time when the offset is known, UTC otherwise.
pub fn wall_clock_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}
