//! Two colours potted back to back is a foul.

use std::collections::VecDeque;

/// Ticks the foul banner stays up.
pub const BANNER_TICKS: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotKind {
    Red,
    Colour,
}

/// Rolling window over potted balls. Each pot is compared with the one before
/// it exactly once.
#[derive(Debug, Default)]
pub struct FoulTracker {
    queue: VecDeque<PotKind>,
    banner_remaining: u32,
    foul_count: u32,
}

impl FoulTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: PotKind) {
        self.queue.push_back(kind);
    }

    /// Advance one tick. Returns true on the tick a new foul is found.
    pub fn tick(&mut self) -> bool {
        if self.banner_remaining > 0 {
            self.banner_remaining -= 1;
            if self.banner_remaining == 0 {
                self.queue.pop_front();
            }
            return false;
        }

        while self.queue.len() >= 2 {
            if self.queue[0] == PotKind::Colour && self.queue[1] == PotKind::Colour {
                self.banner_remaining = BANNER_TICKS;
                self.foul_count += 1;
                log::info!("Foul: two colours potted in a row ({} so far)", self.foul_count);
                return true;
            }
            self.queue.pop_front();
        }
        false
    }

    /// Empty the queue and drop any banner. The foul count survives.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.banner_remaining = 0;
    }

    pub fn banner_active(&self) -> bool {
        self.banner_remaining > 0
    }

    pub fn banner_remaining(&self) -> u32 {
        self.banner_remaining
    }

    pub fn foul_count(&self) -> u32 {
        self.foul_count
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
