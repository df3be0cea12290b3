use log::{debug, trace};

use super::Bean;

/// Observable lifecycle of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// No beans were ever loaded.
    Idle,
    /// Beans are waiting or in flight.
    Running,
    /// Every bean of the current run has settled.
    Drained,
}

/// The bean counter machine.
///
/// Row `y` of the lattice has columns `0..=y`; there are as many rows as
/// slots. At most one bean is in flight per row. Beans move between the
/// waiting pool, the rows and the slots but are never duplicated, so
/// `remaining + in_flight + settled == total` holds after every operation.
#[derive(Debug)]
pub struct Board {
    slot_count: usize,
    total_beans: usize,
    loaded: bool,
    /// Last pushed bean is the next one dropped.
    remaining: Vec<Bean>,
    in_flight: Vec<Option<Bean>>,
    /// Per slot, in arrival order.
    slots: Vec<Vec<Bean>>,
}

impl Board {
    /// Create an empty board with `slot_count` slots
    pub fn new(slot_count: usize) -> Self {
        Board {
            slot_count,
            total_beans: 0,
            loaded: false,
            remaining: Vec::new(),
            in_flight: (0..slot_count).map(|_| None).collect(),
            slots: (0..slot_count).map(|_| Vec::new()).collect(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of beans waiting to be dropped
    pub fn remaining_bean_count(&self) -> usize {
        self.remaining.len()
    }

    /// Number of beans in the current run
    pub fn total_bean_count(&self) -> usize {
        self.total_beans
    }

    pub fn in_flight_bean_count(&self) -> usize {
        self.in_flight.iter().filter(|row| row.is_some()).count()
    }

    pub fn settled_bean_count(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    /// Column of the bean in flight at row `y_pos`, or `None` if the row is
    /// empty or does not exist.
    pub fn in_flight_bean_x_pos(&self, y_pos: usize) -> Option<usize> {
        self.in_flight
            .get(y_pos)
            .and_then(Option::as_ref)
            .map(Bean::x_pos)
    }

    /// Number of beans in slot `i`; 0 for slots that do not exist.
    pub fn slot_bean_count(&self, i: usize) -> usize {
        self.slots.get(i).map_or(0, Vec::len)
    }

    pub fn slot_counts(&self) -> Vec<usize> {
        self.slots.iter().map(Vec::len).collect()
    }

    /// Average slot index over all settled beans, 0.0 when nothing settled.
    pub fn average_slot_bean_count(&self) -> f64 {
        let settled = self.settled_bean_count();
        if settled == 0 {
            return 0.0;
        }
        let weighted: usize = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| i * slot.len())
            .sum();
        weighted as f64 / settled as f64
    }

    pub fn phase(&self) -> BoardPhase {
        if !self.loaded {
            BoardPhase::Idle
        } else if self.remaining.is_empty() && self.in_flight_bean_count() == 0 {
            BoardPhase::Drained
        } else {
            BoardPhase::Running
        }
    }

    /// Hard reset: empty the board and load `beans`. The last bean given is
    /// the first one dropped.
    pub fn reset(&mut self, beans: Vec<Bean>) {
        for row in &mut self.in_flight {
            *row = None;
        }
        for slot in &mut self.slots {
            slot.clear();
        }
        self.total_beans = beans.len();
        self.loaded = true;
        self.remaining = beans;
        debug!(
            "reset: {} beans on a {}-slot board",
            self.total_beans, self.slot_count
        );
        self.drop_next();
    }

    /// Soft reset: scoop up every in-flight and settled bean and run the same
    /// population again.
    pub fn repeat(&mut self) {
        for row in &mut self.in_flight {
            if let Some(bean) = row.take() {
                self.remaining.push(bean);
            }
        }
        for slot in &mut self.slots {
            while let Some(bean) = slot.pop() {
                self.remaining.push(bean);
            }
        }
        debug!("repeat: {} beans recycled", self.remaining.len());
        self.drop_next();
    }

    /// Advance every in-flight bean by one row, bottom row first, then drop a
    /// new bean at the top if any are waiting.
    ///
    /// Returns false once nothing was in flight, i.e. the run has finished.
    pub fn advance_step(&mut self) -> bool {
        let Some(last) = self.slot_count.checked_sub(1) else {
            return false;
        };

        let mut status_change = false;
        for row in (0..self.slot_count).rev() {
            match self.in_flight[row].take() {
                Some(bean) if row == last => {
                    let slot = bean.x_pos().min(last);
                    self.slots[slot].push(bean);
                    status_change = true;
                }
                Some(mut bean) => {
                    bean.choose();
                    self.in_flight[row + 1] = Some(bean);
                    status_change = true;
                }
                None if row < last => {
                    debug_assert!(
                        self.in_flight[row + 1].is_none(),
                        "stale bean below empty row {row}"
                    );
                }
                None => {}
            }
        }
        self.drop_next();

        if status_change {
            trace!(
                "step: remaining={} in_flight={} settled={}",
                self.remaining.len(),
                self.in_flight_bean_count(),
                self.settled_bean_count()
            );
        }
        status_change
    }

    /// Run until `advance_step` reports no more work. Returns the number of
    /// productive steps.
    pub fn drain(&mut self) -> usize {
        self.drain_with(|_| {})
    }

    /// Like [`Board::drain`], calling `observer` after every productive step.
    pub fn drain_with<F: FnMut(&Board)>(&mut self, mut observer: F) -> usize {
        let mut steps = 0;
        while self.advance_step() {
            steps += 1;
            observer(self);
        }
        steps
    }

    /// Keep the upper half of the settled beans: remove `floor(N/2)` beans
    /// starting from slot 0, newest arrivals first.
    pub fn upper_half(&mut self) {
        let to_remove = self.settled_bean_count() / 2;
        debug!("upper half: removing {to_remove} beans");
        Self::remove_from_slots(self.slots.iter_mut(), to_remove);
    }

    /// Keep the lower half of the settled beans: remove `floor(N/2)` beans
    /// starting from the highest slot, newest arrivals first.
    pub fn lower_half(&mut self) {
        let to_remove = self.settled_bean_count() / 2;
        debug!("lower half: removing {to_remove} beans");
        Self::remove_from_slots(self.slots.iter_mut().rev(), to_remove);
    }

    fn remove_from_slots<'a, I>(slots: I, mut to_remove: usize)
    where
        I: Iterator<Item = &'a mut Vec<Bean>>,
    {
        for slot in slots {
            if to_remove == 0 {
                break;
            }
            let take = to_remove.min(slot.len());
            slot.truncate(slot.len() - take);
            to_remove -= take;
        }
    }

    /// Move the next waiting bean to the top row, starting it fresh.
    fn drop_next(&mut self) {
        let Some(top) = self.in_flight.first_mut() else {
            return;
        };
        if let Some(mut bean) = self.remaining.pop() {
            bean.reset();
            *top = Some(bean);
        }
    }
}
