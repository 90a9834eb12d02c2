pub mod args;
pub mod commands;
pub mod output;

pub use args::{
    BatchArgs, Cli, Commands, CompletionsArgs, InspectArgs, MapArgs, OutputFormat, ResolveArgs,
    SourceArgs, TraceArgs, Verbosity,
};
