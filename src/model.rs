use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

pub const NEED_MIN: i32 = 0;
pub const NEED_MAX: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Need {
    Hunger,
    Fun,
    Clean,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Happy,
    Hungry,
    Sleepy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Feed,
    Play,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Feed,
    Play,
    Clean,
}

/// The persisted pet record. Need values only change through [`Stats::clamp_and_set`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    hunger: i32,
    fun: i32,
    clean: i32,
    /// Wall-clock seconds since the Unix epoch of the last applied decay.
    pub last_decay_at: f64,
    pub lifetime_secs: f64,
}

impl Stats {
    pub fn new(defaults: i32, now: &Moment) -> Self {
        let mut s = Self {
            hunger: NEED_MIN,
            fun: NEED_MIN,
            clean: NEED_MIN,
            last_decay_at: now.wall_secs(),
            lifetime_secs: 0.0,
        };
        s.clamp_and_set(Need::Hunger, defaults);
        s.clamp_and_set(Need::Fun, defaults);
        s.clamp_and_set(Need::Clean, defaults);
        s
    }

    pub fn get(&self, need: Need) -> i32 {
        match need {
            Need::Hunger => self.hunger,
            Need::Fun => self.fun,
            Need::Clean => self.clean,
        }
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn fun(&self) -> i32 {
        self.fun
    }

    pub fn clean(&self) -> i32 {
        self.clean
    }

    pub fn clamp_and_set(&mut self, need: Need, value: i32) {
        let v = value.clamp(NEED_MIN, NEED_MAX);
        match need {
            Need::Hunger => self.hunger = v,
            Need::Fun => self.fun = v,
            Need::Clean => self.clean = v,
        }
    }

    /// Relative change, still clamped at the write.
    pub fn adjust(&mut self, need: Need, delta: i32) {
        let cur = self.get(need);
        self.clamp_and_set(need, cur.saturating_add(delta));
    }

    pub fn snapshot(&self) -> Stats {
        *self
    }
}

/// A single observation of both clocks. Intervals inside a session use `mono`;
/// `wall` only feeds the persisted decay bookkeeping.
#[derive(Clone, Copy, Debug)]
pub struct Moment {
    pub mono: Instant,
    pub wall: DateTime<Utc>,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            mono: Instant::now(),
            wall: Utc::now(),
        }
    }

    pub fn after(self, d: Duration) -> Self {
        let wall_step = chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero());
        Self {
            mono: self.mono + d,
            wall: self.wall + wall_step,
        }
    }

    pub fn wall_secs(&self) -> f64 {
        self.wall.timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Mess positions live in this grid; the adapter maps it onto its own window.
/// Rows above `top` hold the need bars and the toast, so messes never land there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playfield {
    pub width: u16,
    pub height: u16,
    pub inset: u16,
    pub top: u16,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 44,
            height: 14,
            inset: 2,
            top: 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceRules {
    pub step_interval_ms: u64,
    pub bob: i32,
}

#[derive(Clone, Debug)]
pub struct Rules {
    pub decay_interval_secs: f64,
    pub hunger_decay: i32,
    pub fun_decay: i32,
    pub clean_decay: i32,
    pub face_threshold: i32,
    pub default_need: i32,
    pub steps_per_sequence: u32,
    pub feed: SequenceRules,
    pub play: SequenceRules,
    pub feed_hunger_gain: i32,
    pub feed_clean_cost: i32,
    pub feed_cooldown_ms: u64,
    pub play_fun_gain: i32,
    pub mess_cap: usize,
    pub mess_base_chance: f64,
    pub mess_dirt_chance: f64,
    pub mess_clean_gain: i32,
    pub bulk_clean_bonus: i32,
    pub playfield: Playfield,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            decay_interval_secs: 5.0,
            hunger_decay: 2,
            fun_decay: 1,
            clean_decay: 1,
            face_threshold: 35,
            default_need: 80,
            steps_per_sequence: 3,
            feed: SequenceRules {
                step_interval_ms: 350,
                bob: 4,
            },
            play: SequenceRules {
                step_interval_ms: 400,
                bob: 6,
            },
            feed_hunger_gain: 25,
            feed_clean_cost: 3,
            feed_cooldown_ms: 1200,
            play_fun_gain: 25,
            mess_cap: 3,
            mess_base_chance: 0.02,
            mess_dirt_chance: 0.05,
            mess_clean_gain: 5,
            bulk_clean_bonus: 20,
            playfield: Playfield::default(),
        }
    }
}

impl Rules {
    pub fn sequence(&self, kind: ActionKind) -> SequenceRules {
        match kind {
            ActionKind::Feed => self.feed,
            ActionKind::Play => self.play,
        }
    }
}

pub const NOTICE_SHORT: Duration = Duration::from_millis(700);
pub const NOTICE_LONG: Duration = Duration::from_millis(1200);

/// A transient toast for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    pub ttl: Duration,
}

impl Notice {
    pub fn short(text: &'static str) -> Self {
        Self {
            text,
            ttl: NOTICE_SHORT,
        }
    }

    pub fn long(text: &'static str) -> Self {
        Self {
            text,
            ttl: NOTICE_LONG,
        }
    }
}
