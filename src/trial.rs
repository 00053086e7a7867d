use std::time::Instant;

use log::debug;

use crate::sequence::{generate_sequence, Mode};
use crate::shuffle::shuffle;
use crate::stopwatch::Stopwatch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Result of picking a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pick {
    /// The cell held the target; progress moved on by one
    Hit,
    /// The cell held the last target; the trial is over
    Completed { elapsed_ms: u64 },
    /// Wrong cell; nothing changed
    Miss,
    /// The trial is finished or the cell does not exist
    Ignored,
}

/// One pass over a shuffled table
#[derive(Debug, Clone)]
pub struct Trial {
    size: usize,
    mode: Mode,
    sequence: Vec<String>,
    grid: Vec<String>,
    target_index: usize,
    phase: Phase,
    stopwatch: Stopwatch,
}

impl Trial {
    pub fn new(size: usize, mode: Mode) -> Self {
        let sequence = generate_sequence(size, mode);
        let grid = shuffle(&sequence);
        Self {
            size,
            mode,
            sequence,
            grid,
            target_index: 0,
            phase: Phase::Idle,
            stopwatch: Stopwatch::new(),
        }
    }

    /// Reshuffles the same sequence and returns to Idle with a zeroed timer.
    pub fn regenerate(&mut self) {
        self.grid = shuffle(&self.sequence);
        self.target_index = 0;
        self.phase = Phase::Idle;
        self.stopwatch.reset();
        debug!("regenerated {}x{} {} grid", self.size, self.size, self.mode);
    }

    /// Idle -> Running. Returns false when the trial was not idle.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running;
        self.stopwatch.start(now);
        true
    }

    /// Picks the cell at `cell`; an idle trial is started first.
    pub fn pick(&mut self, cell: usize, now: Instant) -> Pick {
        if self.phase == Phase::Finished || cell >= self.grid.len() {
            return Pick::Ignored;
        }
        self.start(now);

        if self.grid[cell] != self.sequence[self.target_index] {
            return Pick::Miss;
        }

        self.target_index += 1;
        if self.target_index == self.sequence.len() {
            self.phase = Phase::Finished;
            let elapsed_ms = self.stopwatch.stop(now);
            Pick::Completed { elapsed_ms }
        } else {
            Pick::Hit
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.sequence.get(self.target_index).map(String::as_str)
    }

    /// True for every cell holding the current target symbol.
    pub fn is_target_cell(&self, cell: usize) -> bool {
        match (self.target(), self.grid.get(cell)) {
            (Some(target), Some(value)) => value == target,
            _ => false,
        }
    }

    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        self.stopwatch.elapsed_ms(now)
    }

    pub fn progress(&self) -> usize {
        self.target_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn grid(&self) -> &[String] {
        &self.grid
    }

    /// Index of the first cell holding `symbol`
    pub fn cell_of(&self, symbol: &str) -> Option<usize> {
        self.grid.iter().position(|v| v == symbol)
    }
}
