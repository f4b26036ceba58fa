use crate::model::{Playfield, Rules};
use rand::RngCore;
use tracing::debug;

/// Uniform samples in `[0, 1)`. Any `rand` generator qualifies; tests script their own.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        // 53 random mantissa bits
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mess {
    pub id: MessId,
    pub pos: Pos,
}

/// Chance that one decay tick drops a mess: 2% on a spotless pet, up to 7% when filthy.
pub fn spawn_chance(clean: i32, rules: &Rules) -> f64 {
    let dirt = 1.0 - f64::from(clean) / 100.0;
    rules.mess_base_chance + dirt * rules.mess_dirt_chance
}

#[derive(Clone, Debug, Default)]
pub struct MessField {
    items: Vec<Mess>,
    next_id: u32,
}

impl MessField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mess> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<MessId> {
        self.items.iter().map(|m| m.id).collect()
    }

    /// One roll per decay tick. Draws the spawn sample first, then two position
    /// samples only if a mess actually appears.
    pub fn roll(&mut self, clean: i32, rules: &Rules, rng: &mut dyn RandomSource) -> Option<Mess> {
        let p = spawn_chance(clean, rules);
        let sample = rng.next_unit();
        if sample >= p || self.items.len() >= rules.mess_cap {
            debug!(p, sample, count = self.items.len(), "no mess");
            return None;
        }
        let pos = random_pos(&rules.playfield, rng);
        let mess = Mess {
            id: MessId(self.next_id),
            pos,
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(mess);
        debug!(id = mess.id.0, x = pos.x, y = pos.y, "mess spawned");
        Some(mess)
    }

    pub fn remove(&mut self, id: MessId) -> Option<Mess> {
        let i = self.items.iter().position(|m| m.id == id)?;
        Some(self.items.remove(i))
    }
}

fn random_pos(pf: &Playfield, rng: &mut dyn RandomSource) -> Pos {
    let span_x = pf.width.saturating_sub(pf.inset * 2).max(1);
    let top = pf.top.max(pf.inset);
    let span_y = pf.height.saturating_sub(top + pf.inset).max(1);
    let x = pf.inset + pick(span_x, rng.next_unit());
    let y = top + pick(span_y, rng.next_unit());
    Pos { x, y }
}

fn pick(span: u16, unit: f64) -> u16 {
    ((unit * f64::from(span)) as u16).min(span - 1)
}
