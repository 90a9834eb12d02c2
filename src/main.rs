use clap::{CommandFactory, Parser};
use clap_complete::generate;
use sourcemap_resolver::cli::{Cli, Commands, Verbosity};
use sourcemap_resolver::ui::formatter::Formatter;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing(verbosity: Verbosity) {
    let log_level = verbosity.to_log_level();
    let fallback_filter = format!("sourcemap_resolver={}", log_level);

    let use_json = std::env::var("SMAP_RESOLVE_JSON").is_ok();

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.clone().into()),
            )
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.into()),
            )
            .with(fmt_layer)
            .init();
    }
}

fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    initialize_tracing(verbosity);

    let config = sourcemap_resolver::config::Config::load_or_default();

    match cli.command {
        Commands::Resolve(mut args) => {
            args.merge_config(&config);
            sourcemap_resolver::cli::commands::resolve(args)
        }
        Commands::Trace(mut args) => {
            args.merge_config(&config);
            sourcemap_resolver::cli::commands::trace(args)
        }
        Commands::Batch(mut args) => {
            args.map_args.merge_config(&config);
            sourcemap_resolver::cli::commands::batch(args)
        }
        Commands::Inspect(mut args) => {
            args.map_args.merge_config(&config);
            sourcemap_resolver::cli::commands::inspect(args)
        }
        Commands::Source(mut args) => {
            args.map_args.merge_config(&config);
            sourcemap_resolver::cli::commands::source(args)
        }
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "smap-resolve", &mut io::stdout());
            Ok(())
        }
    }
}
