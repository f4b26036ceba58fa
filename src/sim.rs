use crate::mess::{MessField, MessId, Pos, RandomSource};
use crate::model::{ActionKind, Button, Face, Moment, Need, Notice, Rules, Stats};
use crate::sequence::{Activity, Sequencer};
use tracing::{debug, info};

/// Read-only snapshot for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub hunger: i32,
    pub fun: i32,
    pub clean: i32,
    pub face: Face,
    pub messes: Vec<(MessId, Pos)>,
    pub prop: Option<ActionKind>,
    pub offset: i32,
    pub busy: bool,
    pub lifetime_secs: f64,
}

/// The whole simulation: one owner for stats, the running activity, the
/// messes and the random source. The driver calls [`GameState::tick`] on a
/// fixed cadence and forwards input between ticks.
pub struct GameState<R> {
    rules: Rules,
    stats: Stats,
    face: Face,
    sequencer: Sequencer,
    messes: MessField,
    rng: R,
    notices: Vec<Notice>,
    dirty: bool,
}

impl<R: RandomSource> GameState<R> {
    pub fn new(rules: Rules, rng: R, now: &Moment) -> Self {
        let stats = Stats::new(rules.default_need, now);
        Self::with_stats(rules, stats, rng)
    }

    pub fn with_stats(rules: Rules, stats: Stats, rng: R) -> Self {
        Self {
            rules,
            stats,
            face: Face::Happy,
            sequencer: Sequencer::new(),
            messes: MessField::new(),
            rng,
            notices: Vec::new(),
            dirty: false,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn snapshot(&self) -> Stats {
        self.stats.snapshot()
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn activity(&self) -> Activity {
        self.sequencer.activity()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn messes(&self) -> &MessField {
        &self.messes
    }

    /// True once since the last call if anything worth persisting changed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// One driver cycle: sequence step, then decay (which may roll a mess).
    pub fn tick(&mut self, now: &Moment) {
        if let Some(done) = self.sequencer.step(now, &self.rules) {
            self.finish(done);
        }
        self.maybe_decay(now);
    }

    pub fn press_button(&mut self, button: Button, now: &Moment) {
        if self.sequencer.is_busy() {
            debug!(?button, "input ignored while busy");
            return;
        }
        match button {
            Button::Feed => {
                if self.sequencer.feed_cooling_down(now) {
                    self.notices.push(Notice::long("Hold on..."));
                    return;
                }
                self.begin(ActionKind::Feed, now);
            }
            Button::Play => self.begin(ActionKind::Play, now),
            Button::Clean => self.clean_all(),
        }
    }

    pub fn click_mess(&mut self, id: MessId) {
        if self.sequencer.is_busy() {
            return;
        }
        self.remove_mess(id);
    }

    pub fn view(&self) -> View {
        View {
            hunger: self.stats.hunger(),
            fun: self.stats.fun(),
            clean: self.stats.clean(),
            face: self.face,
            messes: self.messes.iter().map(|m| (m.id, m.pos)).collect(),
            prop: self.sequencer.activity().kind(),
            offset: self.sequencer.offset(&self.rules),
            busy: self.sequencer.is_busy(),
            lifetime_secs: self.stats.lifetime_secs,
        }
    }

    fn begin(&mut self, kind: ActionKind, now: &Moment) {
        if let Err(why) = self.sequencer.start(kind, now, &self.rules) {
            debug!(?kind, %why, "start rejected");
            return;
        }
        self.face = Face::Happy;
        self.notices.push(Notice::short(match kind {
            ActionKind::Feed => "Munch munch",
            ActionKind::Play => "Playing with blocks",
        }));
    }

    fn finish(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Feed => {
                self.stats.adjust(Need::Hunger, self.rules.feed_hunger_gain);
                self.stats.adjust(Need::Clean, -self.rules.feed_clean_cost);
            }
            ActionKind::Play => {
                self.stats.adjust(Need::Fun, self.rules.play_fun_gain);
            }
        }
        self.face = Face::Happy;
        self.dirty = true;
        info!(
            ?kind,
            hunger = self.stats.hunger(),
            fun = self.stats.fun(),
            clean = self.stats.clean(),
            "sequence complete"
        );
    }

    fn clean_all(&mut self) {
        for id in self.messes.ids() {
            self.remove_mess(id);
        }
        self.stats.adjust(Need::Clean, self.rules.bulk_clean_bonus);
        self.face = Face::Happy;
        self.dirty = true;
        self.notices.push(Notice::long("Sparkling clean!"));
    }

    fn remove_mess(&mut self, id: MessId) {
        if self.messes.remove(id).is_none() {
            return;
        }
        self.stats.adjust(Need::Clean, self.rules.mess_clean_gain);
        self.dirty = true;
        self.notices.push(Notice::short("Cleaned up"));
        debug!(id = id.0, left = self.messes.len(), "mess removed");
    }

    /// A single fixed decrement however long the gap; missed intervals are not replayed.
    fn maybe_decay(&mut self, now: &Moment) {
        let wall = now.wall_secs();
        let dt = (wall - self.stats.last_decay_at).max(0.0);
        if dt < self.rules.decay_interval_secs {
            return;
        }
        self.stats.last_decay_at = wall;
        self.stats.lifetime_secs += dt;
        self.stats.adjust(Need::Hunger, -self.rules.hunger_decay);
        self.stats.adjust(Need::Fun, -self.rules.fun_decay);
        self.stats.adjust(Need::Clean, -self.rules.clean_decay);

        self.messes.roll(self.stats.clean(), &self.rules, &mut self.rng);
        self.face = derive_face(&self.stats, !self.messes.is_empty(), &self.rules);
        self.dirty = true;
        debug!(
            dt,
            hunger = self.stats.hunger(),
            fun = self.stats.fun(),
            clean = self.stats.clean(),
            face = ?self.face,
            "decay"
        );
    }
}

/// First match wins: hunger, then boredom, then dirt or an uncleaned mess.
pub fn derive_face(stats: &Stats, has_mess: bool, rules: &Rules) -> Face {
    let low = rules.face_threshold;
    if stats.hunger() < low {
        Face::Hungry
    } else if stats.fun() < low || stats.clean() < low || has_mess {
        Face::Sleepy
    } else {
        Face::Happy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_rules_in_order() {
        let rules = Rules::default();
        let now = Moment::now();
        let mut s = Stats::new(80, &now);
        assert_eq!(derive_face(&s, false, &rules), Face::Happy);
        assert_eq!(derive_face(&s, true, &rules), Face::Sleepy);
        s.clamp_and_set(Need::Clean, 34);
        assert_eq!(derive_face(&s, false, &rules), Face::Sleepy);
        s.clamp_and_set(Need::Fun, 10);
        s.clamp_and_set(Need::Hunger, 34);
        assert_eq!(derive_face(&s, true, &rules), Face::Hungry);
        s.clamp_and_set(Need::Hunger, 35);
        assert_eq!(derive_face(&s, false, &rules), Face::Sleepy);
    }
}
