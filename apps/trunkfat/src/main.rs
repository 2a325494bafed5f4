use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, HttpPredictionClient, MemorySurface, Orchestrator, SessionError,
    SubmitOutcome, UiState,
};
use shared::domain::FormField;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod terminal;

#[derive(Parser, Debug)]
#[command(about = "Trunk fat percentage risk assessment client")]
struct Cli {
    /// Base URL of the prediction service; overrides trunkfat.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one set of measurements and print the assessment.
    Predict {
        #[arg(long, default_value = "")]
        gender: String,
        /// Waist circumference in cm.
        #[arg(long, default_value = "")]
        waist: String,
        /// Height in cm.
        #[arg(long, default_value = "")]
        height: String,
        /// Weight in kg.
        #[arg(long, default_value = "")]
        weight: String,
        /// Age in years.
        #[arg(long, default_value = "")]
        age: String,
    },
    /// Ask the prediction service whether its model is loaded.
    Health,
    /// Edit fields and submit repeatedly from a prompt.
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.server_url {
        settings.server_url = url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let base_url = settings.parsed_server_url()?;
    let client = HttpPredictionClient::new(base_url);
    info!(server_url = %client.base_url(), "using prediction service");

    match cli.command {
        Command::Predict {
            gender,
            waist,
            height,
            weight,
            age,
        } => {
            let surface = Arc::new(MemorySurface::new());
            surface.fill(&gender, &waist, &height, &weight, &age);
            let orchestrator =
                Orchestrator::attach(surface.clone(), client, settings.banner_delay())?;

            let outcome = orchestrator.submit().await?;
            print!("{}", terminal::render(&surface.snapshot()));
            match outcome {
                SubmitOutcome::Succeeded(_) => {}
                SubmitOutcome::Rejected(err) => bail!("input rejected: {err}"),
                SubmitOutcome::Failed(err) => bail!("prediction failed ({}): {err}", err.kind()),
            }
        }
        Command::Health => {
            let health = client.health().await.context("health check failed")?;
            println!(
                "status={} model_loaded={} features={}",
                health.status,
                health.model_loaded,
                health.features.join(",")
            );
        }
        Command::Interactive => {
            let surface = Arc::new(MemorySurface::new());
            let orchestrator =
                Orchestrator::attach(surface.clone(), client, settings.banner_delay())?;
            run_interactive(&orchestrator, &surface).await?;
        }
    }

    Ok(())
}

const HELP: &str = "commands: set <gender|waist|height|weight|age> <value>, submit, reset, show, quit";

async fn run_interactive(
    orchestrator: &Orchestrator<MemorySurface, HttpPredictionClient>,
    surface: &MemorySurface,
) -> Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("set") => {
                let Some(field) = parts.next().and_then(parse_field) else {
                    println!("unknown field; {HELP}");
                    continue;
                };
                let value = parts.collect::<Vec<_>>().join(" ");
                surface.input(field, value);
                orchestrator.field_edited(field);
            }
            Some("submit") => match orchestrator.submit().await {
                Ok(_) => print!("{}", terminal::render(&surface.snapshot())),
                Err(SessionError::Busy(UiState::Success)) => {
                    println!("result already shown; run `reset` first")
                }
                Err(err) => println!("{err}"),
            },
            Some("reset") => match orchestrator.reset() {
                Ok(()) => println!("form cleared"),
                Err(err) => println!("{err}"),
            },
            Some("show") => {
                let snapshot = surface.snapshot();
                for field in FormField::ALL {
                    let value = match field {
                        FormField::Gender => snapshot.gender.clone().unwrap_or_default(),
                        other => snapshot.fields.get(&other).cloned().unwrap_or_default(),
                    };
                    println!("{field}: {value}");
                }
                println!("state: {}", orchestrator.state());
                print!("{}", terminal::render(&snapshot));
            }
            Some("quit") | Some("exit") => break,
            Some(_) => println!("{HELP}"),
            None => {}
        }
    }

    Ok(())
}

fn parse_field(name: &str) -> Option<FormField> {
    FormField::ALL
        .into_iter()
        .find(|field| field.name().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_names_case_insensitively() {
        assert_eq!(parse_field("Waist"), Some(FormField::Waist));
        assert_eq!(parse_field("gender"), Some(FormField::Gender));
        assert_eq!(parse_field("neck"), None);
    }

    #[test]
    fn predict_flags_parse() {
        let cli = Cli::try_parse_from([
            "trunkfat",
            "--server-url",
            "http://localhost:5000",
            "predict",
            "--gender",
            "male",
            "--waist",
            "90",
        ])
        .expect("parse");
        assert_eq!(cli.server_url.as_deref(), Some("http://localhost:5000"));
        match cli.command {
            Command::Predict { gender, waist, age, .. } => {
                assert_eq!(gender, "male");
                assert_eq!(waist, "90");
                assert!(age.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
