use log::info;
use serde::Serialize;

use crate::config::{Keep, MachineConfig};
use crate::machine::{shared_rng, Bean, Board, SharedRng};

/// Outcome of one run of the machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// 0 for the first run, then one per repeat
    pub run: usize,
    pub steps: usize,
    pub slot_counts: Vec<usize>,
    pub average: f64,
}

impl RunReport {
    fn from_board(run: usize, steps: usize, board: &Board) -> Self {
        RunReport {
            run,
            steps,
            slot_counts: board.slot_counts(),
            average: board.average_slot_bean_count(),
        }
    }
}

/// Builds a board from a [`MachineConfig`] and runs it, including the
/// configured half-selection and repeats.
pub struct Experiment {
    config: MachineConfig,
    rng: SharedRng,
}

impl Experiment {
    pub fn new(config: MachineConfig) -> Self {
        let rng = shared_rng(config.seed);
        Experiment { config, rng }
    }

    /// A board loaded with a fresh set of beans, ready for its first step.
    pub fn build_board(&self) -> Board {
        let slot_count = self.config.slot_count;
        let beans = (0..self.config.bean_count)
            .map(|_| Bean::new(slot_count, self.config.mode, self.rng.clone()))
            .collect();
        let mut board = Board::new(slot_count);
        board.reset(beans);
        board
    }

    /// Run every configured pass, returning one report per pass.
    pub fn run(&self) -> Vec<RunReport> {
        let mut board = self.build_board();
        self.run_with(&mut board, |_| {})
    }

    /// Run every configured pass on `board`, calling `observer` after each
    /// productive step.
    pub fn run_with<F: FnMut(&Board)>(&self, board: &mut Board, mut observer: F) -> Vec<RunReport> {
        let mut reports = Vec::with_capacity(self.config.repeats + 1);
        for run in 0..=self.config.repeats {
            if run > 0 {
                board.repeat();
            }
            let steps = board.drain_with(&mut observer);
            match self.config.keep {
                Some(Keep::Upper) => board.upper_half(),
                Some(Keep::Lower) => board.lower_half(),
                None => {}
            }
            let report = RunReport::from_board(run, steps, board);
            info!(
                "run {} ({} mode): {} steps, average slot {:.3}",
                run, self.config.mode, report.steps, report.average
            );
            reports.push(report);
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Mode;

    fn config(mode: Mode) -> MachineConfig {
        MachineConfig {
            slot_count: 6,
            bean_count: 40,
            mode,
            seed: Some(42),
            ..MachineConfig::default()
        }
    }

    #[test]
    fn test_build_board_loads_all_beans() {
        let experiment = Experiment::new(config(Mode::Luck));
        let board = experiment.build_board();
        assert_eq!(board.total_bean_count(), 40);
        assert_eq!(board.remaining_bean_count(), 39);
        assert_eq!(board.in_flight_bean_x_pos(0), Some(0));
    }

    #[test]
    fn test_run_settles_every_bean() {
        let reports = Experiment::new(config(Mode::Luck)).run();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.run, 0);
        assert_eq!(report.steps, 40 + 6 - 1);
        assert_eq!(report.slot_counts.iter().sum::<usize>(), 40);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let first = Experiment::new(config(Mode::Luck)).run();
        let second = Experiment::new(config(Mode::Luck)).run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_skill_repeats_match_first_run() {
        let mut cfg = config(Mode::Skill);
        cfg.repeats = 2;
        let reports = Experiment::new(cfg).run();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].slot_counts, reports[0].slot_counts);
        assert_eq!(reports[2].slot_counts, reports[0].slot_counts);
    }

    #[test]
    fn test_keep_upper_halves_the_beans() {
        let mut cfg = config(Mode::Luck);
        cfg.bean_count = 41;
        cfg.keep = Some(Keep::Upper);
        let reports = Experiment::new(cfg).run();
        assert_eq!(reports[0].slot_counts.iter().sum::<usize>(), 21);
    }

    #[test]
    fn test_keep_lower_never_raises_average() {
        let mut cfg = config(Mode::Luck);
        let full = Experiment::new(cfg.clone()).run();
        cfg.keep = Some(Keep::Lower);
        let lower = Experiment::new(cfg).run();
        assert!(lower[0].average <= full[0].average);
        assert_eq!(lower[0].slot_counts.iter().sum::<usize>(), 20);
    }

    #[test]
    fn test_observer_sees_every_step() {
        let experiment = Experiment::new(config(Mode::Skill));
        let mut board = experiment.build_board();
        let mut seen = 0;
        let reports = experiment.run_with(&mut board, |_| seen += 1);
        assert_eq!(seen, reports[0].steps);
    }

    #[test]
    fn test_report_serializes() {
        let reports = Experiment::new(config(Mode::Skill)).run();
        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["run"], 0);
        assert_eq!(json["slot_counts"].as_array().map(Vec::len), Some(6));
    }
}
