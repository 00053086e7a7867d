// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod best_time;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod sequence;
pub mod shuffle;
pub mod stopwatch;
pub mod trial;
pub mod ui;
pub mod util;
