use anyhow::{Context as AnyhowContext, Result};
use catalog_normalize::{
    render_report, run_cleanup, Category, CleanupOptions, CleanupReport, ReportSummary,
};
use catalog_rules::RuleBook;
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "catalog-cleanup")]
#[command(about = "Fix naming and structure defects in the filament catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog root holding one directory per brand
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Apply fixes (default is a dry run that leaves the catalog untouched)
    #[arg(long)]
    apply: bool,

    /// Only process this brand (directory name)
    #[arg(long)]
    brand: Option<String>,

    /// Only process this category of issues
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
    category: Option<u8>,

    /// Where to write the text report
    #[arg(long, default_value = ".cache/catalog-cleanup-report.txt")]
    report_path: PathBuf,

    /// Rule file to use instead of the built-in rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print a JSON summary instead of the text report
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    applied: bool,
    report_path: &'a Path,
    summary: ReportSummary,
    report: &'a CleanupReport,
}

fn load_rules(path: Option<&Path>) -> Result<RuleBook> {
    match path {
        Some(path) => RuleBook::load(path)
            .with_context(|| format!("Failed to load rules from {}", path.display())),
        None => RuleBook::builtin().context("Built-in rules are invalid"),
    }
}

fn write_report(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write report to {}", path.display()))
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let rules = load_rules(cli.rules.as_deref())?;
    let options = CleanupOptions {
        apply: cli.apply,
        brand: cli.brand.clone(),
        category: cli.category.map(Category::try_from).transpose()?,
    };

    let report = run_cleanup(&cli.data_dir, &rules, &options)
        .with_context(|| format!("Cleanup of {} failed", cli.data_dir.display()))?;

    if report.is_clean() {
        log::info!("No naming issues found in {}", cli.data_dir.display());
    }

    let text = render_report(&report, cli.apply);
    write_report(&cli.report_path, &text)?;
    log::info!("Report written to {}", cli.report_path.display());

    if cli.json {
        let output = JsonOutput {
            applied: cli.apply,
            report_path: &cli.report_path,
            summary: report.summary(),
            report: &report,
        };
        print_stdout(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_stdout(&text)?;
    }
    Ok(())
}
