//! Timed three-step feed/play interactions.
//!
//! At most one sequence runs at a time; the [`Activity`] enum makes an
//! overlapping feed and play unrepresentable.

use crate::error::Rejected;
use crate::model::{ActionKind, Moment, Rules};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequence {
    pub step: u32,
    pub next_step_at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Feeding(Sequence),
    Playing(Sequence),
}

impl Activity {
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Activity::Idle => None,
            Activity::Feeding(_) => Some(ActionKind::Feed),
            Activity::Playing(_) => Some(ActionKind::Play),
        }
    }

    fn sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Activity::Idle => None,
            Activity::Feeding(s) | Activity::Playing(s) => Some(s),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sequencer {
    activity: Activity,
    feed_cooldown_until: Option<Instant>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            activity: Activity::Idle,
            feed_cooldown_until: None,
        }
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.activity, Activity::Idle)
    }

    pub fn feed_cooldown_until(&self) -> Option<Instant> {
        self.feed_cooldown_until
    }

    pub fn feed_cooling_down(&self, now: &Moment) -> bool {
        self.feed_cooldown_until.is_some_and(|t| now.mono < t)
    }

    pub fn start(&mut self, kind: ActionKind, now: &Moment, rules: &Rules) -> Result<(), Rejected> {
        if self.is_busy() {
            return Err(Rejected::Busy);
        }
        if kind == ActionKind::Feed && self.feed_cooling_down(now) {
            return Err(Rejected::Cooldown);
        }
        let seq = Sequence {
            step: 0,
            next_step_at: now.mono + step_interval(kind, rules),
        };
        self.activity = match kind {
            ActionKind::Feed => Activity::Feeding(seq),
            ActionKind::Play => Activity::Playing(seq),
        };
        debug!(?kind, "sequence started");
        Ok(())
    }

    /// Advance at most one step. Returns the kind that just finished, if any;
    /// the caller applies the reward.
    pub fn step(&mut self, now: &Moment, rules: &Rules) -> Option<ActionKind> {
        let kind = self.activity.kind()?;
        let interval = step_interval(kind, rules);
        let seq = self.activity.sequence_mut()?;
        if now.mono < seq.next_step_at {
            return None;
        }
        seq.step += 1;
        seq.next_step_at = now.mono + interval;
        debug!(?kind, step = seq.step, "sequence step");
        if seq.step < rules.steps_per_sequence {
            return None;
        }

        self.activity = Activity::Idle;
        if kind == ActionKind::Feed {
            self.feed_cooldown_until = Some(now.mono + Duration::from_millis(rules.feed_cooldown_ms));
        }
        Some(kind)
    }

    /// Vertical sprite displacement for the current step: odd steps lift, even steps drop.
    pub fn offset(&self, rules: &Rules) -> i32 {
        let (kind, seq) = match self.activity {
            Activity::Idle => return 0,
            Activity::Feeding(s) => (ActionKind::Feed, s),
            Activity::Playing(s) => (ActionKind::Play, s),
        };
        let bob = rules.sequence(kind).bob;
        match seq.step {
            0 => 0,
            n if n % 2 == 1 => -bob,
            _ => bob,
        }
    }
}

fn step_interval(kind: ActionKind, rules: &Rules) -> Duration {
    Duration::from_millis(rules.sequence(kind).step_interval_ms)
}
