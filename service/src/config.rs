use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// Which dispatch path the driver binary feeds incoming events through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DispatchMode {
    Sync,
    Async,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DispatchModeParseError;

impl FromStr for DispatchMode {
    type Err = DispatchModeParseError;
    fn from_str(mode: &str) -> Result<DispatchMode, Self::Err> {
        match mode.to_lowercase().as_str() {
            "sync" => Ok(DispatchMode::Sync),
            "async" => Ok(DispatchMode::Async),
            _ => Err(DispatchModeParseError),
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DispatchMode::Sync => write!(f, "sync"),
            DispatchMode::Async => write!(f, "async"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Whether events read by the driver binary are dispatched inline or
    /// scheduled onto the job queue.
    #[arg(
        long,
        env,
        default_value_t = DispatchMode::Sync,
        value_parser = clap::builder::PossibleValuesParser::new(["sync", "async"])
            .map(|s| s.parse::<DispatchMode>().unwrap()),
        )]
    pub dispatch_mode: DispatchMode,

    /// Maximum number of retries for a deferred job whose handler fails
    #[arg(long, env, default_value_t = 3)]
    pub job_max_retries: u32,

    /// Base delay in seconds for the exponential job retry backoff
    #[arg(long, env, default_value_t = 1)]
    pub job_retry_base_secs: u64,

    /// Cap in seconds on the exponential job retry backoff
    #[arg(long, env, default_value_t = 60)]
    pub job_retry_max_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
