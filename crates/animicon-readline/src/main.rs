mod command;
mod helper;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;

use animicon_core::effects::EXPORT_FILENAME;
use animicon_core::session::{ErrorMessage, IntentOutcome, SessionController};
use animicon_infrastructure::{
    AnimiconPaths, ConfigService, DownloadDirSaver, SecretServiceImpl, SystemClipboard, logging,
};
use animicon_interaction::GeminiBackend;

use crate::command::{Command, PickTarget};
use crate::helper::CliHelper;

/// Describe an icon, pick an animation, get an animated SVG.
#[derive(Parser, Debug)]
#[command(name = "animicon", version, long_about = None)]
struct Args {
    /// Directory holding config.toml, secret.json and logs.
    #[arg(long, value_name = "PATH")]
    config_dir: Option<PathBuf>,

    /// Where /export writes the SVG.
    #[arg(long, value_name = "PATH")]
    export_dir: Option<PathBuf>,

    /// Gemini model to use instead of the configured one.
    #[arg(long, value_name = "NAME")]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let paths = AnimiconPaths::new(args.config_dir.as_deref())?;
    let config_service = ConfigService::new(&paths);
    let mut config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.config_path().display()))?;
    if let Some(model) = args.model {
        config.gemini.model = model;
    }
    if let Some(dir) = args.export_dir {
        config.export.directory = Some(dir);
    }

    let _log_guard = logging::init(&config.logging, &paths.logs_dir())?;
    tracing::info!("[main] Starting animicon with model {}", config.gemini.model);

    // ===== Backend Initialization =====
    paths.ensure_secret_file()?;
    let secrets = SecretServiceImpl::new(&paths);
    let backend = GeminiBackend::from_secret_service(&secrets, &config.gemini)
        .await
        .with_context(|| {
            format!(
                "Add your Gemini API key to {} or set GEMINI_API_KEY",
                paths.secret_file().display()
            )
        })?;

    let saver = DownloadDirSaver::resolve(config.export.directory.as_deref());
    let export_dir = saver.directory().to_path_buf();
    let controller = Arc::new(SessionController::with_backend(
        Arc::new(backend),
        Arc::new(SystemClipboard::new()),
        Arc::new(saver),
    ));

    // Spawn renderer task
    let renderer = tokio::spawn(render::run(controller.subscribe()));

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Animicon ===".bright_magenta().bold());
    println!(
        "{}",
        "Describe an icon to get animation ideas, or '/help' for commands.".bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let command = Command::parse(&line);
                if command == Command::Empty {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                match command {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Empty => {}
                    Command::Help => print_help(),
                    Command::Unknown(message) => println!("{}", message.bright_black()),
                    Command::State => match serde_json::to_string_pretty(&controller.snapshot()) {
                        Ok(json) => println!("{}", json.bright_black()),
                        Err(e) => eprintln!("{}", format!("Error: {e}").red()),
                    },
                    Command::Describe(description) => {
                        let repeated_blank = description.trim().is_empty()
                            && controller.snapshot().error
                                == Some(ErrorMessage::DescriptionRequired);
                        if repeated_blank {
                            println!("{}", ErrorMessage::DescriptionRequired.as_str().red());
                            continue;
                        }
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            report(controller.request_suggestions(&description).await);
                        });
                    }
                    Command::Pick(target) => {
                        let state = controller.snapshot();
                        let Some(chosen) = target.resolve(&state) else {
                            if let PickTarget::Index(index) = target {
                                println!(
                                    "{}",
                                    format!("There is no suggestion #{index}.").yellow()
                                );
                            }
                            continue;
                        };
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            report(
                                controller
                                    .request_artifact(&state.icon_description, &chosen)
                                    .await,
                            );
                        });
                    }
                    Command::Copy => {
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            report(controller.acknowledge_copy().await);
                        });
                    }
                    Command::Export => {
                        let outcome = controller.export_artifact();
                        if outcome.is_applied() {
                            println!(
                                "{}",
                                format!(
                                    "Saving {} to {}",
                                    EXPORT_FILENAME,
                                    export_dir.display()
                                )
                                .bright_black()
                            );
                        }
                        report(outcome);
                    }
                    Command::Reset => report(controller.reset()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // The controller owns the watch sender, so the renderer never sees it close.
    renderer.abort();
    tracing::info!("[main] Exiting");

    Ok(())
}

/// Prints refusals. Applied outcomes are rendered from the state stream.
fn report(outcome: IntentOutcome) {
    match outcome {
        IntentOutcome::Applied(_) => {}
        IntentOutcome::Rejected(reason) => println!("{}", format!("Ignored: {reason}").yellow()),
        IntentOutcome::Superseded => {
            println!("{}", "A result from an earlier request was discarded.".bright_black())
        }
    }
}

fn print_help() {
    let rows = [
        ("<text>", "describe an icon and get animation ideas"),
        ("/describe <text>", "same as typing the description"),
        ("/pick <n>|<text>", "generate the icon with that animation"),
        ("/copy", "copy the SVG to the clipboard"),
        ("/export", "save the SVG as a file"),
        ("/reset", "start over with a new icon"),
        ("/state", "show the session state"),
        ("quit", "leave"),
    ];
    for (cmd, what) in rows {
        println!("  {:<18} {}", cmd.bright_cyan(), what.bright_black());
    }
}
