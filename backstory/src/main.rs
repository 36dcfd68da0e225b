//! Character backstory generator CLI.
//!
//! Reads a character sheet as JSON, asks the model for a backstory and
//! optionally appends it to the character's biography.
//!
//! ```bash
//! backstory generate --actor kael.json --tone stoic --save
//! backstory --interactive generate --actor kael.json
//! backstory prompt --name Kael --class Ranger
//! ```
//!
//! Batch mode (the default) reports notices and results as JSON lines on
//! stdout, suitable for automated testing.

mod frontend;
mod render;

use anyhow::Context;
use backstory_core::{Actor, BackstoryService, Frontend, Outcome, Settings};
use clap::{Parser, Subcommand};
use frontend::{BatchFrontend, FormOverrides, InteractiveFrontend};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "backstory", version, about = "Generate character backstories")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = "backstory.toml")]
    config: PathBuf,

    /// Prompt for each field on the terminal
    #[arg(long, global = true)]
    interactive: bool,

    /// Run as the game master (shows configuration help)
    #[arg(long, global = true)]
    gm: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a backstory, optionally saving it to the character file
    Generate {
        /// Character sheet (JSON)
        #[arg(long)]
        actor: Option<PathBuf>,

        #[command(flatten)]
        overrides: FormOverrides,

        /// Append the result to the character's biography
        #[arg(long)]
        save: bool,
    },
    /// Print the prompt that would be sent, without calling the API
    Prompt {
        /// Character sheet (JSON)
        #[arg(long)]
        actor: Option<PathBuf>,

        #[command(flatten)]
        overrides: FormOverrides,
    },
    /// Show the welcome guide
    Welcome,
    /// Show the effective settings, with the API key masked
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backstory=info,backstory_core=info".into()),
        )
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)
        .await
        .with_context(|| format!("loading settings from {}", cli.config.display()))?
        .apply_env();
    debug!(config = %cli.config.display(), model = %settings.openai_model, "settings loaded");

    match cli.command {
        Command::Generate {
            actor,
            overrides,
            save,
        } => generate(settings, actor.as_deref(), overrides, save, cli.interactive, cli.gm).await,
        Command::Prompt { actor, overrides } => {
            let service = BackstoryService::from_settings(settings);
            let actor = load_actor(actor.as_deref()).await?;
            let mut form = service.open_form(actor.as_ref())?;
            overrides.apply(&mut form);
            println!("{}", service.prompt_for(&form));
            Ok(ExitCode::SUCCESS)
        }
        Command::Welcome => {
            println!(
                "{}",
                render::html_to_text(&backstory_core::welcome::welcome_message(cli.gm))
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings => {
            print!("{}", settings.redacted().to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn generate(
    settings: Settings,
    actor_path: Option<&Path>,
    overrides: FormOverrides,
    save: bool,
    interactive: bool,
    is_gm: bool,
) -> anyhow::Result<ExitCode> {
    let service = BackstoryService::from_settings(settings);
    let mut actor = load_actor(actor_path).await?;

    let mut frontend: Box<dyn Frontend> = if interactive {
        Box::new(InteractiveFrontend::new(
            io::stdin().lock(),
            io::stdout(),
            overrides,
            save,
        ))
    } else {
        Box::new(BatchFrontend::new(io::stdout(), overrides, save))
    };

    show_welcome(&service, frontend.as_mut(), is_gm);

    match service.run(frontend.as_mut(), actor.as_mut()).await {
        Outcome::Completed(completion) => {
            if let (true, Some(actor), Some(path)) = (completion.saved, &actor, actor_path) {
                actor
                    .save_json(path)
                    .await
                    .with_context(|| format!("saving {}", path.display()))?;
                info!(path = %path.display(), "biography updated");
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Dismissed | Outcome::Discarded => Ok(ExitCode::SUCCESS),
        Outcome::Failed(_) => Ok(ExitCode::FAILURE),
    }
}

fn show_welcome(service: &BackstoryService, frontend: &mut dyn Frontend, is_gm: bool) {
    if let Some(welcome) = service.welcome(is_gm) {
        frontend.show_message(&welcome);
    }
}

async fn load_actor(path: Option<&Path>) -> anyhow::Result<Option<Actor>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let actor = Actor::load_json(path)
        .await
        .with_context(|| format!("loading {}", path.display()))?;
    debug!(name = %actor.name(), kind = %actor.kind(), "actor loaded");
    Ok(Some(actor))
}
