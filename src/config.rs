use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

/// Terminal snake with role skills and an unlock shop.
#[derive(Parser, Debug, Clone)]
#[command(name = "valosnake", version, about)]
pub struct Config {
    /// File the game log is written to. The terminal itself is taken by the game.
    #[arg(long, env = "VALOSNAKE_LOG", default_value = "valosnake.log")]
    pub log_file: PathBuf,

    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, env = "VALOSNAKE_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Seed for food placement. Random when omitted.
    #[arg(long, env = "VALOSNAKE_SEED")]
    pub seed: Option<u64>,
}

impl Config {
    pub fn init_logging(&self) -> io::Result<()> {
        WriteLogger::init(
            self.log_level,
            LogConfig::default(),
            File::create(&self.log_file)?,
        )
        .map_err(io::Error::other)
    }
}
