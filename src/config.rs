use clap::Parser;

/// Environment variable that overrides the `-v` log filter.
pub const LOG_ENV: &str = "PIPESH_LOG";

/// Command-line configuration.
#[derive(Debug, Parser)]
#[command(name = "pipesh", version, about = "A small shell that runs pipelines with file redirection")]
pub struct Config {
    /// Run a single command line and exit with its status
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Option<String>,

    /// Prompt shown before each line when stdin is a terminal
    #[arg(long, default_value = "pipesh> ")]
    pub prompt: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
