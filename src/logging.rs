use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Env, Target};

/// Routes `log` output to `path`, since the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_file_logger(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}
