use std::path::PathBuf;

use adr::structs::message::ChannelMode;
use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    author     = env!("CARGO_PKG_AUTHORS"),
    about      = "ADR (Astra Digital Radio) ancillary data encoder",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat recoverable problems as fatal errors.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inject ancillary data into a Layer II frame stream.
    Encode(EncodeArgs),

    /// Print the ancillary data carried by an ADR stream.
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Input MPEG-1 Layer II stream, 48 kHz at 192 kbit/s (use "-" for
    /// stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output ADR stream (use "-" for stdout).
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Channel mode of the input audio. Selects the program information
    /// mode character.
    #[arg(short = 'm', long, value_enum, default_value_t = Mode::Joint)]
    pub mode: Mode,

    /// Station ID. Limited to 32 characters, can't contain a '#'.
    #[arg(short = 's', long, default_value = "")]
    pub station: String,

    /// Flag frames as carrying a Scale Factor CRC (ScF-CRC).
    #[arg(long)]
    pub scfcrc: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input ADR stream (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Single channel.
    Mono,
    /// Two independent channels.
    Dual,
    /// Joint stereo (default).
    Joint,
    /// Discrete stereo.
    Stereo,
}

impl Mode {
    pub fn to_channel_mode(self) -> ChannelMode {
        match self {
            Mode::Mono => ChannelMode::Mono,
            Mode::Dual => ChannelMode::Dual,
            Mode::Joint => ChannelMode::JointStereo,
            Mode::Stereo => ChannelMode::Stereo,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}
