//! Focus timer state machine for StudyPath.
//!
//! This crate models the focus/break countdown as an explicit finite-state
//! machine rather than ad-hoc conditional logic inside a tick callback.
//! The timer has three phases (focus, short break, long break); a tick
//! decrements the remaining seconds for the current phase, and the phase
//! transitions exactly when the counter reaches zero. A long break is chosen
//! after every `sessions_before_long_break`-th completed focus block.

use serde::{Deserialize, Serialize};

/// The phase the timer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Durations and cadence for a focus timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Length of a focus block in seconds.
    pub focus_secs: u32,
    /// Length of a short break in seconds.
    pub short_break_secs: u32,
    /// Length of a long break in seconds.
    pub long_break_secs: u32,
    /// A long break replaces the short break after every Nth focus block.
    pub sessions_before_long_break: u32,
}

impl Default for FocusConfig {
    /// Classic 25/5/15 cadence with a long break every fourth block.
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            sessions_before_long_break: 4,
        }
    }
}

impl FocusConfig {
    /// Duration in seconds of the given phase under this config.
    pub const fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

/// A countdown timer that alternates focus blocks with breaks.
///
/// Ticks are expected once per second but the machine itself is tick-driven
/// and makes no timing assumptions; callers own the clock.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    config: FocusConfig,
    phase: Phase,
    remaining_secs: u32,
    completed_focus_blocks: u32,
}

impl FocusTimer {
    /// Create a timer at the start of a focus block.
    pub const fn new(config: FocusConfig) -> Self {
        Self {
            config,
            phase: Phase::Focus,
            remaining_secs: config.focus_secs,
            completed_focus_blocks: 0,
        }
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds remaining in the current phase.
    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Number of focus blocks completed so far.
    pub const fn completed_focus_blocks(&self) -> u32 {
        self.completed_focus_blocks
    }

    /// Advance the timer by one second.
    ///
    /// Returns `Some(new_phase)` when this tick drained the counter and the
    /// timer transitioned, `None` otherwise.
    pub fn tick(&mut self) -> Option<Phase> {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let next = match self.phase {
            Phase::Focus => {
                self.completed_focus_blocks += 1;
                if self.config.sessions_before_long_break > 0
                    && self.completed_focus_blocks % self.config.sessions_before_long_break == 0
                {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };

        self.phase = next;
        self.remaining_secs = self.config.phase_secs(next);
        Some(next)
    }
}

/// One entry in an expanded focus schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub phase: Phase,
    pub duration_secs: u32,
}

/// Expand a config into the ordered phase sequence covering `focus_blocks`
/// focus blocks and the breaks between them. The trailing break after the
/// last focus block is omitted.
pub fn schedule(config: FocusConfig, focus_blocks: u32) -> Vec<ScheduleBlock> {
    let mut blocks = Vec::new();
    for n in 1..=focus_blocks {
        blocks.push(ScheduleBlock {
            phase: Phase::Focus,
            duration_secs: config.focus_secs,
        });
        if n == focus_blocks {
            break;
        }
        let break_phase = if config.sessions_before_long_break > 0
            && n % config.sessions_before_long_break == 0
        {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        };
        blocks.push(ScheduleBlock {
            phase: break_phase,
            duration_secs: config.phase_secs(break_phase),
        });
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_block_flips_after_exact_tick_count() {
        let mut timer = FocusTimer::new(FocusConfig::default());
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_secs(), 1500);

        // The first 1499 ticks stay in the focus phase.
        for _ in 0..1499 {
            assert_eq!(timer.tick(), None);
            assert_eq!(timer.phase(), Phase::Focus);
        }

        // Tick 1500 drains the counter and flips to the break.
        assert_eq!(timer.tick(), Some(Phase::ShortBreak));
        assert_eq!(timer.remaining_secs(), 300);
        assert_eq!(timer.completed_focus_blocks(), 1);
    }

    #[test]
    fn test_long_break_every_fourth_block() {
        let config = FocusConfig {
            focus_secs: 2,
            short_break_secs: 1,
            long_break_secs: 3,
            sessions_before_long_break: 4,
        };
        let mut timer = FocusTimer::new(config);
        let mut transitions = Vec::new();
        for _ in 0..40 {
            if let Some(phase) = timer.tick() {
                transitions.push(phase);
            }
        }

        // Blocks 1-3 earn short breaks, block 4 a long one.
        let breaks: Vec<Phase> = transitions
            .iter()
            .copied()
            .filter(|p| *p != Phase::Focus)
            .collect();
        assert_eq!(
            &breaks[..4],
            &[
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::LongBreak
            ]
        );
    }

    #[test]
    fn test_break_returns_to_focus() {
        let config = FocusConfig {
            focus_secs: 1,
            short_break_secs: 2,
            long_break_secs: 3,
            sessions_before_long_break: 4,
        };
        let mut timer = FocusTimer::new(config);
        assert_eq!(timer.tick(), Some(Phase::ShortBreak));
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), Some(Phase::Focus));
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn test_schedule_expansion() {
        let config = FocusConfig::default();
        let blocks = schedule(config, 4);

        // 4 focus blocks with 3 breaks in between.
        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks[0].phase, Phase::Focus);
        assert_eq!(blocks[1].phase, Phase::ShortBreak);
        assert_eq!(blocks[6].phase, Phase::Focus);
        assert!(blocks.iter().all(|b| b.phase != Phase::LongBreak));

        // A fifth block puts the long break after the fourth.
        let blocks = schedule(config, 5);
        assert_eq!(blocks.len(), 9);
        assert_eq!(blocks[7].phase, Phase::LongBreak);
        assert_eq!(blocks[7].duration_secs, 900);
    }

    #[test]
    fn test_schedule_of_zero_blocks_is_empty() {
        assert!(schedule(FocusConfig::default(), 0).is_empty());
    }
}
