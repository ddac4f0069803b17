use anyhow::{Context, Result};
use clap::Parser;
use memviz::{
    cli::{Cli, OutputFormat},
    config::RenderConfig,
    dot_output::DotOutput,
    graph::MemoryGraph,
    json_output::JsonOutput,
    pipeline::Pipeline,
    record::format_hex,
};
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Read the transcript from a file or stdin
fn read_input(cli: &Cli) -> Result<String> {
    match &cli.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read dump file: {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read dump from stdin")?;
            Ok(input)
        }
    }
}

/// Report page-index conflicts on stderr
fn report_conflicts(graph: &MemoryGraph) {
    for conflict in &graph.conflicts {
        eprintln!(
            "warning: physical page {} is anchored by both {} and {}; edges target {}",
            format_hex(conflict.page),
            conflict.previous,
            conflict.current,
            conflict.current
        );
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let base = match &args.config {
        Some(path) => RenderConfig::from_toml(path)?,
        None => RenderConfig::default(),
    };
    let config = args.apply(base);

    let input = read_input(&args)?;
    let graph = Pipeline::new(&config)?.render(&input)?;

    if !args.quiet && !args.debug {
        report_conflicts(&graph);
    }

    let rendered = match args.format {
        OutputFormat::Dot => {
            DotOutput::new(config.theme.palette(), config.style.clone(), config.labels)
                .render(&graph)
        }
        OutputFormat::Json => JsonOutput::new(&graph, config.theme)
            .to_json()
            .context("Failed to serialize graph")?,
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(())
}
