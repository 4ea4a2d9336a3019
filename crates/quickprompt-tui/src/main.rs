use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use quickprompt_core::request::DEFAULT_PROMPT;
use quickprompt_core::{
    resolve_credential, CompletionResult, CompletionWorkflow, OpenAIClient, RequestConfig,
    Settings,
};
use tracing::{info, warn};

mod app;
mod cli;
mod handler;
mod logging;
mod tui;
mod ui;

use app::{openai_backend_factory, App};
use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command.clone().unwrap_or(Commands::Tui) {
        Commands::Ask { prompt } => {
            logging::setup_stderr_logging();
            let settings = load_settings(&cli);
            Ok(ask(&cli, settings, prompt.as_deref().unwrap_or(DEFAULT_PROMPT)))
        }
        Commands::Tui => {
            let log_path = logging::setup_file_logging().ok();
            let settings = load_settings(&cli);
            info!(log = ?log_path, "starting terminal window");

            // The request worker uses blocking I/O; the runtime only drives the UI
            let runtime = tokio::runtime::Runtime::new()?;
            let result = runtime.block_on(run_tui(&cli, settings));
            // Don't hang on quit waiting for an in-flight request
            runtime.shutdown_timeout(Duration::from_millis(200));
            result?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Settings file plus CLI overrides. A broken file is reported and ignored.
fn load_settings(cli: &Cli) -> Settings {
    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default settings");
        Settings::new()
    });
    cli.apply_overrides(settings)
}

/// One prompt in, one answer out.
fn ask(cli: &Cli, settings: Settings, prompt: &str) -> ExitCode {
    let credential = match resolve_credential(cli.api_key.as_deref()) {
        Some(credential) if credential.is_well_formed() => credential,
        _ => {
            eprintln!("{}", "⚠ Please enter your OpenAI API key!".yellow());
            eprintln!("Pass --api-key or set {}", "OPENAI_API_KEY".bold());
            return ExitCode::from(2);
        }
    };

    let config = RequestConfig::new(prompt)
        .with_max_tokens(settings.max_tokens())
        .with_temperature(settings.temperature());

    let client = match OpenAIClient::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match CompletionWorkflow::new(client).execute(credential, config) {
        CompletionResult::Success(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        CompletionResult::Failure(message) => {
            eprintln!("{}: {}", "Error".red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

async fn run_tui(cli: &Cli, settings: Settings) -> Result<()> {
    let credential = resolve_credential(cli.api_key.as_deref());
    let mut app = App::new(settings.clone(), credential, openai_backend_factory(settings));
    if let Some(path) = &cli.config {
        app = app.with_settings_path(path.clone());
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new(tui::TICK_RATE);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        anyhow::Ok(())
    }
    .await;

    tui::restore()?;
    result
}
