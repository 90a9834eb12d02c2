use crate::batch::BatchResolver;
use crate::cli::args::{
    BatchArgs, InspectArgs, MapArgs, OutputFormat, ResolveArgs, SourceArgs, TraceArgs,
};
use crate::cli::output::{CommandOutput, MapSummary, ResolutionOutput};
use crate::loader::{self, LoadedMap};
use crate::logging;
use crate::sourcemap::{PositionQuery, ResolvedPosition, SourceMapDocument};
use crate::stacktrace;
use crate::ui::formatter::Formatter;
use crate::ResolverError;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::time::Instant;

fn print_info(message: impl AsRef<str>) {
    println!("{}", Formatter::info(message));
}

fn print_warning(message: impl AsRef<str>) {
    println!("{}", Formatter::warning(message));
}

fn print_error(message: impl AsRef<str>) {
    eprintln!("{}", Formatter::error(message));
}

fn print_json<T: Serialize>(output: &CommandOutput<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(output).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Load and parse the map named by `--map`
pub fn load_document(args: &MapArgs) -> crate::Result<(LoadedMap, SourceMapDocument)> {
    logging::log_loading_map(&args.map.to_string_lossy());
    let loaded = loader::load_map_text(&args.map)?;
    let origin = loaded.origin.to_string();

    match SourceMapDocument::parse(&loaded.text) {
        Ok(document) => {
            logging::log_map_parsed(
                &origin,
                loaded.text.len(),
                document.mappings().len(),
                document.sources().len(),
            );
            Ok((loaded, document))
        }
        Err(e) => {
            logging::log_map_rejected(&origin, &e.to_string());
            Err(e)
        }
    }
}

fn resolution_output<'a>(
    document: &'a SourceMapDocument,
    query: &PositionQuery,
    resolved: &ResolvedPosition<'a>,
    with_context: bool,
) -> ResolutionOutput<'a> {
    ResolutionOutput {
        query: query.to_string(),
        source: resolved.source,
        line: resolved.original_line,
        column: resolved.original_column,
        name: resolved.name,
        context: if with_context {
            document.source_line_for(resolved)
        } else {
            None
        },
        function: None,
    }
}

fn print_context(document: &SourceMapDocument, resolved: &ResolvedPosition<'_>) {
    if let (Some(line), Some(number)) = (document.source_line_for(resolved), resolved.original_line)
    {
        println!(
            "{}",
            Formatter::format_context_line(number, line, resolved.original_column)
        );
    }
}

/// Execute the resolve command
pub fn resolve(args: ResolveArgs) -> Result<()> {
    let (_, document) = load_document(&args.map_args)?;
    let format = args.map_args.output_format();

    let mut outputs = Vec::with_capacity(args.positions.len());
    let mut errors: Vec<ResolverError> = Vec::new();

    for position in &args.positions {
        let resolved = position
            .parse::<PositionQuery>()
            .and_then(|query| Ok((query, document.original_position_for(query)?)));

        match resolved {
            Ok((query, resolved)) => {
                logging::log_query_resolved(&query.to_string(), resolved.is_resolved());
                if format == OutputFormat::Text {
                    println!("{}", Formatter::format_resolution(&query, &resolved));
                    if args.context {
                        print_context(&document, &resolved);
                    }
                }
                outputs.push(resolution_output(&document, &query, &resolved, args.context));
            }
            Err(e) => {
                if format == OutputFormat::Text {
                    print_error(format!("{}: {}", position, e));
                }
                errors.push(e);
            }
        }
    }

    if format == OutputFormat::Json {
        print_json(&CommandOutput::partial(
            &outputs,
            errors.iter().map(ToString::to_string).collect(),
        ))?;
    }

    match errors.into_iter().next() {
        Some(first) => Err(first.into()),
        None => Ok(()),
    }
}

/// Execute the trace command
pub fn trace(args: TraceArgs) -> Result<()> {
    if args.stack.is_none() && args.map_args.reads_stdin() {
        return Err(ResolverError::InvalidArguments(
            "map and stack trace both on stdin; pass --stack <FILE>".to_string(),
        )
        .into());
    }

    let (_, document) = load_document(&args.map_args)?;
    let format = args.map_args.output_format();

    let text = match &args.stack {
        Some(path) => fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read stack trace {:?}", path))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .into_diagnostic()
                .wrap_err("Failed to read stack trace from stdin")?;
            text
        }
    };

    let frames = stacktrace::parse_stack(&text);
    logging::log_frames_parsed(frames.len());
    if frames.is_empty() {
        return Err(ResolverError::InvalidArguments(
            "no stack frames found in input".to_string(),
        )
        .into());
    }

    let mut outputs = Vec::with_capacity(frames.len());
    for frame in &frames {
        let selected = args
            .only_file
            .as_deref()
            .map(|filter| frame.file.contains(filter))
            .unwrap_or(true);

        let query = frame.query();
        let resolved = if selected {
            match document.original_position_for(query) {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    tracing::debug!(frame = %frame.file, error = %e, "Skipping frame");
                    None
                }
            }
        } else {
            None
        };

        if format == OutputFormat::Text {
            println!("{}", Formatter::format_frame(frame, resolved.as_ref()));
            if let (true, Some(resolved)) = (args.context, &resolved) {
                print_context(&document, resolved);
            }
        }

        let resolved = resolved.unwrap_or_default();
        let mut output = resolution_output(&document, &query, &resolved, args.context);
        output.function = frame.function.clone();
        outputs.push(output);
    }

    if format == OutputFormat::Json {
        print_json(&CommandOutput::success(&outputs))?;
    }
    Ok(())
}

/// Execute the batch command
pub fn batch(args: BatchArgs) -> Result<()> {
    let (_, document) = load_document(&args.map_args)?;
    let items = BatchResolver::load_batch_file(&args.file)?;

    let started = Instant::now();
    let resolver = BatchResolver::new(&document);
    let results = resolver.execute_batch(&items);
    let summary = BatchResolver::summarize(&results, started);
    logging::log_batch_complete(summary.resolved, summary.total);

    match args.map_args.output_format() {
        OutputFormat::Text => {
            println!("{}", BatchResolver::render_results(&results, &summary));
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct BatchOutput<'r, 'a> {
                results: &'r [crate::batch::BatchResult<'a>],
                summary: &'r crate::batch::BatchSummary,
            }
            let errors = results.iter().filter_map(|r| r.error.clone()).collect();
            print_json(&CommandOutput::partial(
                BatchOutput {
                    results: &results,
                    summary: &summary,
                },
                errors,
            ))?;
        }
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(miette::miette!(
            "{} of {} batch queries failed or errored",
            summary.failed + summary.errors,
            summary.total
        ))
    }
}

/// Execute the inspect command
pub fn inspect(args: InspectArgs) -> Result<()> {
    let (loaded, document) = load_document(&args.map_args)?;

    match args.map_args.output_format() {
        OutputFormat::Text => {
            print_info(format!("Loaded source map: {}", loaded.origin));
            println!("{}", Formatter::format_map_summary(&document));

            if args.sources {
                println!("\nSources:");
                for (index, source) in document.sources().iter().enumerate() {
                    let embedded = document
                        .sources_content()
                        .and_then(|c| c.get(index))
                        .map(Option::is_some)
                        .unwrap_or(false);
                    println!(
                        "  [{}] {}{}",
                        index,
                        source,
                        if embedded { " (embedded)" } else { "" }
                    );
                }
            }

            if args.names {
                println!("\nNames:");
                if document.names().is_empty() {
                    print_warning("  (none)");
                }
                for (index, name) in document.names().iter().enumerate() {
                    println!("  [{}] {}", index, name);
                }
            }
        }
        OutputFormat::Json => {
            print_json(&CommandOutput::success(MapSummary {
                origin: loaded.origin.to_string(),
                version: document.version(),
                file: document.file(),
                source_root: document.source_root(),
                sources: document.sources().len(),
                embedded_sources: document.embedded_source_count(),
                names: document.names().len(),
                segments: document.mappings().len(),
                mapped_lines: document.mapped_line_count(),
                source_list: args.sources.then_some(document.sources()),
                name_list: args.names.then_some(document.names()),
            }))?;
        }
    }
    Ok(())
}

/// Execute the source command
pub fn source(args: SourceArgs) -> Result<()> {
    let (_, document) = load_document(&args.map_args)?;

    let content = document.source_content_for(&args.source).ok_or_else(|| {
        ResolverError::InvalidArguments(format!(
            "no embedded content for source {:?}",
            args.source
        ))
    })?;

    match args.map_args.output_format() {
        OutputFormat::Text => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
        OutputFormat::Json => print_json(&CommandOutput::success(content))?,
    }
    Ok(())
}
