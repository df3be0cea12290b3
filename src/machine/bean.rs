use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::Mode;

/// Random source shared by every bean of a run. Draw order is fixed by the
/// board's row traversal, so a fixed seed reproduces a run exactly.
pub type SharedRng = Rc<RefCell<StdRng>>;

/// Create a shared random source, seeded when `seed` is given.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Rc::new(RefCell::new(rng))
}

/// Per-mode decision state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Luck,
    Skill { level: usize, remaining: usize },
}

/// A single bean falling through the board.
///
/// The column is kept within `0..slot_count` at all times; moves that would
/// leave the board are swallowed.
#[derive(Debug, Clone)]
pub struct Bean {
    slot_count: usize,
    x_pos: usize,
    decision: Decision,
    rng: SharedRng,
}

impl Bean {
    /// Create a bean for a board with `slot_count` slots.
    ///
    /// In skill mode the skill level is drawn from a normal distribution with
    /// mean `(slot_count - 1) / 2` and standard deviation
    /// `sqrt(slot_count * 0.5 * 0.5)`, rounded and clamped to the valid
    /// columns. Luck beans draw nothing at construction.
    pub fn new(slot_count: usize, mode: Mode, rng: SharedRng) -> Self {
        let decision = match mode {
            Mode::Luck => Decision::Luck,
            Mode::Skill => {
                let level = draw_skill_level(slot_count, &rng);
                Decision::Skill {
                    level,
                    remaining: level,
                }
            }
        };
        Bean {
            slot_count,
            x_pos: 0,
            decision,
            rng,
        }
    }

    /// Create a skill bean with a fixed skill level instead of a drawn one.
    pub fn with_skill(slot_count: usize, level: usize, rng: SharedRng) -> Self {
        let level = level.min(slot_count.saturating_sub(1));
        Bean {
            slot_count,
            x_pos: 0,
            decision: Decision::Skill {
                level,
                remaining: level,
            },
            rng,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.decision {
            Decision::Luck => Mode::Luck,
            Decision::Skill { .. } => Mode::Skill,
        }
    }

    /// Skill level of the bean, 0 for luck beans
    pub fn skill_level(&self) -> usize {
        match self.decision {
            Decision::Luck => 0,
            Decision::Skill { level, .. } => level,
        }
    }

    /// Right moves still owed before the bean falls back to moving left
    pub fn skill_remaining(&self) -> usize {
        match self.decision {
            Decision::Luck => 0,
            Decision::Skill { remaining, .. } => remaining,
        }
    }

    /// Current column
    pub fn x_pos(&self) -> usize {
        self.x_pos
    }

    /// Return to the post-construction state. Keeps mode and skill level and
    /// never touches the random source.
    pub fn reset(&mut self) {
        self.x_pos = 0;
        if let Decision::Skill { level, remaining } = &mut self.decision {
            *remaining = *level;
        }
    }

    /// Make the decision for one peg and move at most one column.
    pub fn choose(&mut self) {
        let rightmost = self.slot_count.saturating_sub(1);
        match &mut self.decision {
            Decision::Luck => {
                // The draw is consumed even when the move is blocked.
                let go_right = self.rng.borrow_mut().random_range(0..2u8) == 1;
                if go_right {
                    if self.x_pos < rightmost {
                        self.x_pos += 1;
                    }
                } else if self.x_pos > 0 {
                    self.x_pos -= 1;
                }
            }
            Decision::Skill { remaining, .. } => {
                if *remaining > 0 && self.x_pos < rightmost {
                    self.x_pos += 1;
                    *remaining -= 1;
                } else if self.x_pos > 0 {
                    self.x_pos -= 1;
                }
            }
        }
    }
}

fn draw_skill_level(slot_count: usize, rng: &SharedRng) -> usize {
    let max_level = slot_count.saturating_sub(1);
    let mean = max_level as f64 * 0.5;
    let std_dev = (slot_count as f64 * 0.5 * 0.5).sqrt();
    let sample = match Normal::new(mean, std_dev) {
        Ok(normal) => normal.sample(&mut *rng.borrow_mut()),
        Err(_) => mean,
    };
    sample.round().clamp(0.0, max_level as f64) as usize
}
