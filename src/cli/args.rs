use crate::config::Config;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smap-resolve")]
#[command(about = "Resolve generated JavaScript positions through source maps", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve generated LINE:COLUMN positions to original locations
    Resolve(ResolveArgs),

    /// Resolve every frame of a JavaScript stack trace
    Trace(TraceArgs),

    /// Resolve a JSON file of positions in one pass
    Batch(BatchArgs),

    /// Show a summary of a source map
    Inspect(InspectArgs),

    /// Print the embedded content of one original source
    Source(SourceArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct MapArgs {
    /// Source map file, generated file with a sourceMappingURL comment, or `-` for stdin
    #[arg(short, long)]
    pub map: PathBuf,

    /// Output format (default: text, or the config file's output.format)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl MapArgs {
    pub fn merge_config(&mut self, config: &Config) {
        if self.format.is_none() {
            self.format = match config.output.format.as_deref() {
                Some("json") => Some(OutputFormat::Json),
                Some("text") => Some(OutputFormat::Text),
                _ => None,
            };
        }
    }

    /// True when `--map -` reads the map from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.map.as_os_str() == "-"
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Text)
    }
}

#[derive(Parser)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub map_args: MapArgs,

    /// Positions as LINE:COLUMN (1-based line, 0-based column)
    #[arg(required = true, value_name = "LINE:COLUMN", allow_hyphen_values = true)]
    pub positions: Vec<String>,

    /// Show the original source line for each resolution
    #[arg(long)]
    pub context: bool,
}

impl ResolveArgs {
    pub fn merge_config(&mut self, config: &Config) {
        self.map_args.merge_config(config);
        if !self.context {
            self.context = config.output.context.unwrap_or(false);
        }
    }
}

#[derive(Parser)]
pub struct TraceArgs {
    #[command(flatten)]
    pub map_args: MapArgs,

    /// File holding the stack trace (default: stdin)
    #[arg(short, long)]
    pub stack: Option<PathBuf>,

    /// Only resolve frames whose file contains this text
    #[arg(long, value_name = "TEXT")]
    pub only_file: Option<String>,

    /// Show the original source line for each frame
    #[arg(long)]
    pub context: bool,
}

impl TraceArgs {
    pub fn merge_config(&mut self, config: &Config) {
        self.map_args.merge_config(config);
        if self.only_file.is_none() {
            self.only_file = config.resolve.only_file.clone();
        }
        if !self.context {
            self.context = config.output.context.unwrap_or(false);
        }
    }
}

#[derive(Parser)]
pub struct BatchArgs {
    #[command(flatten)]
    pub map_args: MapArgs,

    /// JSON array of queries: "LINE:COL", [line, col] or {"line", "column", "label", "expected_source"}
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub map_args: MapArgs,

    /// List every source
    #[arg(long)]
    pub sources: bool,

    /// List every name
    #[arg(long)]
    pub names: bool,
}

#[derive(Parser)]
pub struct SourceArgs {
    #[command(flatten)]
    pub map_args: MapArgs,

    /// Source path as listed in the map (raw or normalized spelling)
    pub source: String,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
