// src/cli/mod.rs
//! CLI command handlers.

pub mod args;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;

use crate::analyzer::{DetectorError, ProgressObserver, Stage};
use crate::model::{RiskCategory, Severity};
use crate::report::{console, ReportData, ReportFormat};
use crate::rules::RuleSet;
use crate::service::{AnalysisOptions, AnalysisService};

pub use args::{Cli, Commands};

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            input,
            rules,
            format,
            output,
            min_severity,
            category,
            no_dedup,
            top,
            quiet,
        } => handle_analyze(AnalyzeArgs {
            input,
            rules,
            format,
            output,
            min_severity,
            category,
            no_dedup,
            top,
            quiet,
        }),
        Commands::Rules { rules } => handle_rules(rules.as_deref()),
    }
}

struct AnalyzeArgs {
    input: PathBuf,
    rules: Option<PathBuf>,
    format: ReportFormat,
    output: Option<PathBuf>,
    min_severity: Option<Severity>,
    category: Vec<String>,
    no_dedup: bool,
    top: Option<usize>,
    quiet: bool,
}

fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let categories = parse_categories(&args.category)?;
    let options = AnalysisOptions {
        rules_path: args.rules,
        format: args.format,
        min_severity: args.min_severity,
        categories,
        dedup: !args.no_dedup,
        top_n: args.top,
    };

    let observer = ConsoleProgressObserver;
    let observers: Vec<&dyn ProgressObserver> = if args.quiet {
        Vec::new()
    } else {
        vec![&observer]
    };

    let service = AnalysisService::new(options);
    let run = service.run(&args.input, &observers)?;

    let report_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.format.default_file_name()));
    fs::write(&report_path, &run.rendered)
        .with_context(|| format!("writing report to {}", report_path.display()))?;

    if !args.quiet {
        let data = ReportData::new(&run.requirements, &run.outcome);
        console::print_report(&data);
        println!();
        println!("Report written to {}", report_path.display().to_string().bold());
    }
    Ok(())
}

fn parse_categories(names: &[String]) -> Result<Vec<RiskCategory>> {
    names
        .iter()
        .map(|name| {
            RiskCategory::parse(name).ok_or_else(|| anyhow!("unknown category: {name}"))
        })
        .collect()
}

fn handle_rules(path: Option<&Path>) -> Result<()> {
    let rules = match path {
        Some(path) => RuleSet::from_path(path)?,
        None => RuleSet::builtin(),
    };

    for category in rules.active_categories() {
        println!("{}", category.as_str().bold());
        for rule in rules.enabled_rules(category) {
            println!(
                "  {} {} {}",
                rule.severity.label().yellow(),
                rule.name,
                rule.message.dimmed()
            );
        }
    }
    println!();
    println!(
        "top_n={} max_failure_rate={:.2}",
        rules.settings.top_n, rules.settings.max_failure_rate
    );
    Ok(())
}

/// Prints stage transitions and isolated detector failures to stderr so
/// stdout stays clean for the report.
pub struct ConsoleProgressObserver;

impl ProgressObserver for ConsoleProgressObserver {
    fn on_stage(&self, stage: Stage) {
        eprintln!("{} {}", "==>".cyan().bold(), stage.label());
    }

    fn on_error(&self, error: &DetectorError) {
        let scope = error.requirement_id.as_deref().unwrap_or("batch");
        eprintln!(
            "{} {} detector failed on {}: {}",
            "warn:".yellow().bold(),
            error.category.as_str(),
            scope,
            error.message
        );
    }
}
