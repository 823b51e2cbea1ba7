//! Resume analyzer: score a resume against a job description

mod ai;
mod cli;
mod config;
mod error;
mod input;
mod output;
mod processing;

use ai::{analyze_with_fallback, AiResponseNormalizer, CannedResponseProvider};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::{Config, OutputFormat};
use error::{Result, ResumeAnalyzerError};
use log::{error, info};
use output::{AnalysisReport, ConsoleFormatter, JsonFormatter, MarkdownFormatter, OutputFormatter};
use processing::RuleBasedAnalyzer;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            ai_response,
            detailed,
            output,
            save,
        } => {
            info!("Starting resume analysis");

            let output_format = match &output {
                Some(format) => {
                    cli::parse_output_format(format).map_err(ResumeAnalyzerError::InvalidInput)?
                }
                None => config.output.format.clone(),
            };

            let started = Instant::now();

            let resume_text = input::extract_text(&resume).await?;
            let job_text = input::extract_text(&job).await?;
            info!(
                "Extracted {} chars from resume, {} chars from job description",
                resume_text.len(),
                job_text.len()
            );

            let analyzer = RuleBasedAnalyzer::new(config.analysis.clone());

            let result = match &ai_response {
                Some(path) => {
                    let provider = CannedResponseProvider::new(path);
                    let normalizer =
                        AiResponseNormalizer::new(RuleBasedAnalyzer::new(config.analysis.clone()));
                    analyze_with_fallback(&provider, &normalizer, &analyzer, &resume_text, &job_text)
                        .await
                }
                None => analyzer.analyze(&resume_text, &job_text),
            };

            let report = AnalysisReport::new(
                result,
                &resume,
                &job,
                started.elapsed().as_millis() as u64,
            );

            let formatted = format_report(&report, &output_format, &config, detailed)?;

            match save {
                Some(path) => {
                    write_report(&path, &formatted).await?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", formatted),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Top keywords extracted: {}", config.analysis.top_keywords);
                println!("Minimum entry length: {}", config.analysis.min_entry_length);
                println!(
                    "Strength threshold: {:.1}",
                    config.analysis.strength_threshold
                );
                println!(
                    "Weakness threshold: {:.1}",
                    config.analysis.weakness_threshold
                );
                println!(
                    "Keyword recommendations: {}",
                    config.analysis.max_keyword_recommendations
                );
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

fn format_report(
    report: &AnalysisReport,
    format: &OutputFormat,
    config: &Config,
    detailed: bool,
) -> Result<String> {
    let detailed = detailed || config.output.detailed;
    match format {
        OutputFormat::Console => {
            ConsoleFormatter::new(config.output.color_output, detailed).format_report(report)
        }
        OutputFormat::Json => JsonFormatter::default().format_report(report),
        OutputFormat::Markdown => MarkdownFormatter.format_report(report),
    }
}

async fn write_report(path: &PathBuf, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}
