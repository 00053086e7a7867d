use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use ratatui::layout::Rect;

use crate::best_time::BestTimes;
use crate::config::{ConfigStore, Settings};
use crate::sequence::{MAX_SIZE, MIN_SIZE};
use crate::trial::{Pick, Trial};
use crate::ui::layout::{fitted_grid, screen_layout};

/// What the event loop should do after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// The whole exercise: settings, the current trial and the personal best
pub struct App {
    pub settings: Settings,
    pub trial: Trial,
    /// Best time for the current (size, mode)
    pub best: Option<u64>,
    /// Elapsed time as last sampled for display
    pub display_ms: u64,
    /// Keyboard-selected cell
    pub cursor: usize,
    /// Set when the last finished trial beat the stored best
    pub new_best: bool,
    best_times: BestTimes,
    config_store: Option<Box<dyn ConfigStore>>,
}

impl App {
    pub fn new(
        settings: Settings,
        best_times: BestTimes,
        config_store: Option<Box<dyn ConfigStore>>,
    ) -> Self {
        let settings = settings.normalized();
        let best = best_times.get(settings.size, settings.mode);
        Self {
            trial: Trial::new(settings.size, settings.mode),
            settings,
            best,
            display_ms: 0,
            cursor: 0,
            new_best: false,
            best_times,
            config_store,
        }
    }

    /// Ticks are only needed while the clock is visibly running.
    pub fn needs_tick(&self) -> bool {
        self.trial.is_running()
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.trial.is_running() {
            self.display_ms = self.trial.elapsed_ms(now);
        }
    }

    /// New shuffle of the current sequence, clock back to zero
    pub fn regenerate(&mut self) {
        self.trial.regenerate();
        self.display_ms = 0;
        self.new_best = false;
    }

    pub fn start(&mut self, now: Instant) {
        if self.trial.start(now) {
            info!(
                "trial started: {}x{} {}",
                self.settings.size, self.settings.size, self.settings.mode
            );
        }
    }

    pub fn pick(&mut self, cell: usize, now: Instant) -> Pick {
        self.start(now);
        let pick = self.trial.pick(cell, now);

        match pick {
            Pick::Completed { elapsed_ms } => {
                self.display_ms = elapsed_ms;
                self.finish(elapsed_ms);
            }
            Pick::Hit | Pick::Miss => self.display_ms = self.trial.elapsed_ms(now),
            Pick::Ignored => {}
        }
        pick
    }

    fn finish(&mut self, elapsed_ms: u64) {
        let Settings { size, mode, .. } = self.settings;
        info!("trial finished: {size}x{size} {mode} in {elapsed_ms} ms");

        match self.best_times.record(size, mode, elapsed_ms) {
            Ok(true) => {
                info!("new best for {size}x{size} {mode}: {elapsed_ms} ms");
                self.new_best = true;
            }
            Ok(false) => {}
            Err(e) => warn!("failed to store best time: {e}"),
        }
        self.best = self.best_times.get(size, mode);
    }

    /// Applies new settings; a changed size or mode starts a fresh trial.
    pub fn apply_settings(&mut self, settings: Settings) {
        let settings = settings.normalized();
        if settings == self.settings {
            return;
        }
        let reshape = settings.size != self.settings.size || settings.mode != self.settings.mode;
        self.settings = settings;

        if reshape {
            self.trial = Trial::new(settings.size, settings.mode);
            self.display_ms = 0;
            self.new_best = false;
            self.cursor = self.cursor.min(settings.size * settings.size - 1);
        }
        self.best = self.best_times.get(settings.size, settings.mode);

        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&self.settings) {
                warn!("failed to save settings: {e}");
            }
        }
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let size = self.settings.size as i32;
        let col = (self.cursor as i32 % size + dx).clamp(0, size - 1);
        let row = (self.cursor as i32 / size + dy).clamp(0, size - 1);
        self.cursor = (row * size + col) as usize;
    }

    /// Maps a mouse press in a terminal of `area` onto a grid cell and picks it.
    pub fn on_click(&mut self, column: u16, row: u16, area: Rect, now: Instant) -> Pick {
        let layout = screen_layout(area);
        // nothing is drawn when the grid does not fit, so nothing can be hit
        let Some(geo) = fitted_grid(layout.grid, self.settings.size, self.trial.sequence()) else {
            return Pick::Ignored;
        };
        match geo.cell_at(column, row) {
            Some(cell) => {
                self.cursor = cell;
                self.pick(cell, now)
            }
            None => Pick::Ignored,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        let mut settings = self.settings;
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char(' ') => {
                if self.trial.has_finished() {
                    self.regenerate();
                } else {
                    self.start(now);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.regenerate(),
            KeyCode::Enter => {
                self.pick(self.cursor, now);
            }
            KeyCode::Left => self.move_cursor(-1, 0),
            KeyCode::Right => self.move_cursor(1, 0),
            KeyCode::Up => self.move_cursor(0, -1),
            KeyCode::Down => self.move_cursor(0, 1),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                settings.size = (settings.size + 1).min(MAX_SIZE);
                self.apply_settings(settings);
            }
            KeyCode::Char('-') => {
                settings.size = settings.size.saturating_sub(1).max(MIN_SIZE);
                self.apply_settings(settings);
            }
            KeyCode::Char('m') => {
                settings.mode = settings.mode.next();
                self.apply_settings(settings);
            }
            KeyCode::Char('f') => {
                settings.show_fixation = !settings.show_fixation;
                self.apply_settings(settings);
            }
            KeyCode::Char('h') => {
                settings.highlight_target = !settings.highlight_target;
                self.apply_settings(settings);
            }
            _ => {}
        }
        Control::Continue
    }

    /// One-line status shown under the timer
    pub fn status(&self) -> &'static str {
        match (self.trial.has_started(), self.trial.has_finished()) {
            (false, _) => "press Space or pick a cell to start",
            (true, false) => "running… press r to restart",
            (true, true) if self.new_best => "new best! press r for a new grid",
            (true, true) => "done! press r for a new grid",
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("settings", &self.settings)
            .field("trial", &self.trial)
            .field("best", &self.best)
            .field("display_ms", &self.display_ms)
            .field("cursor", &self.cursor)
            .field("new_best", &self.new_best)
            .finish_non_exhaustive()
    }
}
