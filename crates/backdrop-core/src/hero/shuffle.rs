use rand::prelude::*;

/// Shuffled, non-repeating play order over `len` swap clips.
///
/// Each cycle visits every clip once. When a cycle is exhausted a cooldown of
/// `cooldown_loops` loop plays starts; the next cycle is shuffled only when
/// the cooldown has run out.
pub struct SwapShuffle {
    order: Vec<usize>,
    cursor: usize,
    cooldown: u32,
    cooldown_loops: u32,
    last: Option<usize>,
    cycles: u32,
    rng: StdRng,
}

/// Outcome of a loop play while the shuffle may be cooling down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cooldown {
    /// Not cooling down; a swap may be inserted.
    Inactive,
    /// This loop play was consumed by the cooldown.
    Consumed,
    /// This was the last cooldown loop; a fresh cycle is ready.
    Finished,
}

impl SwapShuffle {
    pub fn new(len: usize, cooldown_loops: u32, seed: u64) -> Self {
        let mut s = Self {
            order: (0..len).collect(),
            cursor: 0,
            cooldown: 0,
            cooldown_loops,
            last: None,
            cycles: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        s.reshuffle();
        s
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Completed shuffles, including the initial one.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn cooling_down(&self) -> bool {
        self.cooldown > 0
    }

    /// Clip that the next [`advance`](Self::advance) would return.
    pub fn peek(&self) -> Option<usize> {
        if self.cooldown > 0 {
            return None;
        }
        self.order.get(self.cursor).copied()
    }

    /// Take the next clip of the current cycle.
    pub fn advance(&mut self) -> Option<usize> {
        let id = self.peek()?;
        self.cursor += 1;
        self.last = Some(id);
        if self.cursor >= self.order.len() {
            if self.cooldown_loops == 0 {
                self.reshuffle();
            } else {
                self.cooldown = self.cooldown_loops;
                log::debug!("swap cycle exhausted; cooling down for {} loops", self.cooldown);
            }
        }
        Some(id)
    }

    /// Account for one loop play.
    pub fn on_loop(&mut self) -> Cooldown {
        if self.cooldown == 0 {
            return Cooldown::Inactive;
        }
        self.cooldown -= 1;
        if self.cooldown == 0 {
            self.reshuffle();
            Cooldown::Finished
        } else {
            Cooldown::Consumed
        }
    }

    fn reshuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
        // Never start a cycle with the clip that ended the previous one.
        if let (Some(last), true) = (self.last, self.order.len() > 1) {
            if self.order[0] == last {
                let j = self.rng.gen_range(1..self.order.len());
                self.order.swap(0, j);
            }
        }
        self.cursor = 0;
        self.cycles += 1;
        log::debug!("swap order reshuffled (cycle {})", self.cycles);
    }
}
