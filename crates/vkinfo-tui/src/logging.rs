use anyhow::Context;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::File;
use std::path::Path;

/// Filter used when neither `RUST_LOG` nor the config sets one.
const DEFAULT_FILTER: &str = "warn";

/// Initialise `env_logger`.
///
/// `RUST_LOG` wins over `level`. With a `file`, records are appended there. Without one, the
/// interactive viewer logs nothing (stderr would draw over the alternate screen) while print
/// mode logs to stderr.
pub fn init(level: Option<&str>, file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let env = Env::default().default_filter_or(level.unwrap_or(DEFAULT_FILTER));
    let mut builder = Builder::from_env(env);

    match file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None if interactive => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {}
    }

    builder.try_init().context("couldn't init logger")?;
    Ok(())
}
