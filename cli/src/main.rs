mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use doctangle::SyncReport;

#[derive(Parser)]
#[command(
    name = "doctangle",
    version,
    about = "Keeps compiled documentation examples in sync with the build manifest"
)]
struct Cli {
    /// Disable colored warning output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract tagged code blocks and register new build targets
    Sync(RunArgs),

    /// Report what sync would change without writing; exits 1 if out of date
    Check(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// TOML configuration file
    #[arg(long, default_value = "doctangle.toml")]
    config: PathBuf,

    /// Directory scanned for .md documents
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Directory artifacts are written into
    #[arg(long)]
    out: Option<PathBuf>,

    /// Build manifest path (defaults to {out}/meson.build)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Fence tag selecting which code blocks to extract
    #[arg(long)]
    tag: Option<String>,

    /// Artifact file extension (defaults to the tag)
    #[arg(long)]
    ext: Option<String>,

    /// Build dependency identifier templated into each registration line.
    /// Repeatable.
    #[arg(long = "dep")]
    deps: Vec<String>,

    /// Prefix artifact names with a slug of the owning document
    #[arg(long)]
    per_document: bool,

    /// Suppress the summary line
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let (args, apply) = match &cli.command {
        Command::Sync(args) => (args, true),
        Command::Check(args) => (args, false),
    };

    let config = match settings::load(args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let result = if apply {
        doctangle::sync(&config, &mut files)
    } else {
        doctangle::check(&config, &mut files)
    };

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let term_config = term::Config::default();

    let report = match result {
        Ok(report) => report,
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    };

    for warning in &report.warnings {
        let diagnostic = warning.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &term_config, &files, &diagnostic);
    }

    if apply {
        if !args.quiet {
            summarize(&report);
        }
    } else if !report.is_clean() {
        for line in &report.appended {
            eprintln!("missing: {}", line);
        }
        eprintln!(
            "out of date: {} target(s) unregistered",
            report.appended.len()
        );
        process::exit(1);
    } else if !args.quiet {
        summarize(&report);
    }
}

fn summarize(report: &SyncReport) {
    if report.is_clean() {
        eprintln!(
            "up to date: {} target(s) already registered",
            report.skipped
        );
    } else {
        eprintln!(
            "registered {} new target(s), skipped {}",
            report.appended.len(),
            report.skipped
        );
    }
}
