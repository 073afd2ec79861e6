//! # treeloc
//!
//! A CLI tool for counting source lines and root-namespace dependencies in
//! Java-like source trees.
//!
//! ## Overview
//!
//! treeloc is built on top of treeloclib. Point it at a source root such as
//! `src/main/java`: every top-level directory there is a root namespace, and
//! for every source file treeloc reports its source lines and the root
//! namespaces it depends on through its imports.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze the current directory
//! treeloc .
//!
//! # Output as JSON
//! treeloc src/main/java --output json
//!
//! # Filter files with glob patterns
//! treeloc src/main/java --include "**/service/**" --exclude "**/generated/**"
//!
//! # Drop getters and setters from the enhanced count
//! treeloc src/main/java --skip-accessors
//!
//! # Only .java files, skipping dot-directories
//! treeloc src/main/java --ext java --skip-hidden
//!
//! # Kotlin-style extension, same comment syntax
//! treeloc src/main/kotlin --ext kt
//! ```
//!
//! Logging goes to stderr and is controlled by `TREELOC_LOG`
//! (for example `TREELOC_LOG=treeloclib=trace`).

use std::process::ExitCode;
use std::sync::Once;

use clap::{Arg, ArgAction, ArgMatches, Command};
use console::Style;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use treeloclib::{analyze_tree, AnalyzeOptions, FilterConfig, ReportTable, Syntax};

static INIT: Once = Once::new();

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("treeloc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Source line counter with root-namespace dependency analysis")
        .arg(
            Arg::new("path")
                .help("Source root to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("ext")
                .long("ext")
                .help("Only analyze files with this extension (imports resolve to it)"),
        )
        .arg(
            Arg::new("skip-hidden")
                .long("skip-hidden")
                .action(ArgAction::SetTrue)
                .help("Skip hidden directories"),
        )
        .arg(
            Arg::new("skip-accessors")
                .long("skip-accessors")
                .action(ArgAction::SetTrue)
                .help("Drop getter/setter boilerplate from the enhanced count"),
        )
        .arg(
            Arg::new("baseline-only")
                .long("baseline-only")
                .action(ArgAction::SetTrue)
                .conflicts_with("skip-accessors")
                .help("Only compute the baseline count"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log progress to stderr"),
        )
}

/// Install the stderr subscriber. `TREELOC_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose {
            "treeloc=debug,treeloclib=debug"
        } else {
            "treeloc=warn,treeloclib=warn"
        };
        let filter =
            EnvFilter::try_from_env("TREELOC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    });
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> Result<FilterConfig, anyhow::Error> {
    let mut filter = FilterConfig::new().skip_hidden(matches.get_flag("skip-hidden"));

    if let Some(ext) = matches.get_one::<String>("ext") {
        filter = filter.with_extension(ext);
    }

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

/// Build analysis options from matches
fn build_options(matches: &ArgMatches) -> Result<AnalyzeOptions, anyhow::Error> {
    let mut syntax = Syntax::java();
    if let Some(ext) = matches.get_one::<String>("ext") {
        syntax = syntax.with_extension(ext);
    }

    Ok(AnalyzeOptions::new()
        .syntax(syntax)
        .filter(build_filter(matches)?)
        .skip_accessors(matches.get_flag("skip-accessors"))
        .enhanced(!matches.get_flag("baseline-only")))
}

/// Pad every cell; numbers are right-aligned, labels and dependencies left.
fn render_table(table: &ReportTable) -> String {
    let widths = table.column_widths();
    let last = widths.len().saturating_sub(1);
    let header_style = Style::new().bold();

    let format_cells = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let width = widths.get(idx).copied().unwrap_or(0);
                if idx == 0 || idx == last {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let header = format_cells(table.headers.iter().map(String::as_str).collect());
    let separator = "-".repeat(widths.iter().sum::<usize>() + 2 * last);

    let mut out = String::new();
    out.push_str(&header_style.apply_to(header).to_string());
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in &table.rows {
        let cells = std::iter::once(row.label.as_str())
            .chain(row.values.iter().map(String::as_str))
            .collect();
        out.push_str(&format_cells(cells));
        out.push('\n');
    }
    out.push_str(&separator);
    out.push('\n');
    let footer = std::iter::once(table.footer.label.as_str())
        .chain(table.footer.values.iter().map(String::as_str))
        .collect();
    out.push_str(&header_style.apply_to(format_cells(footer)).to_string());
    out.push('\n');

    if !table.notes.is_empty() {
        out.push('\n');
        for note in &table.notes {
            out.push_str(&format!("note: {note}\n"));
        }
    }
    out
}

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or(".");
    let options = build_options(matches)?;
    debug!(path, extension = %options.syntax.extension, "starting analysis");

    let report = analyze_tree(path, options)?;

    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", render_table(&ReportTable::from_report(&report))),
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
