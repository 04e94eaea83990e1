use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use vesty_bridge::commands::{help_text, BridgeCommand, BridgeParser};
use vesty_bridge::{export, render, settings};
use vesty_core::{CannedResolver, NotificationKind, Rejected, SystemClock, VestyEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VESTY_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_arg = std::env::args().nth(1).map(PathBuf::from);
    let config = settings::load_config(config_arg.as_deref())?;

    let (engine, mut events) = VestyEngine::start(
        config,
        Arc::new(CannedResolver::new()),
        Arc::new(SystemClock),
    );

    // Printer task: everything the engine reports goes to stdout.
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Some(text) = render::event_text(&event) {
                println!("{}", text);
            }
        }
    });

    for entry in engine.transcript().await {
        println!("{}", render::entry_line(&entry));
    }
    println!("Type `help` for console commands, `!help` for front-end commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match BridgeParser::parse(&line) {
            BridgeCommand::Console(input) => match engine.submit(&input).await {
                Ok(_) | Err(Rejected::EmptyInput) => {}
                Err(Rejected::AlreadyRunning) => println!("⏳ A command is still running."),
            },

            BridgeCommand::Clear => engine.clear().await,

            BridgeCommand::Save => {
                let text = engine.export_transcript().await;
                match export::save_transcript(&settings::export_dir(), export::save_date(Utc::now()), &text) {
                    Ok(path) => {
                        engine
                            .notify(
                                NotificationKind::Success,
                                "Log saved",
                                path.display().to_string(),
                                None,
                            )
                            .await;
                    }
                    Err(e) => {
                        tracing::error!("save failed: {:#}", e);
                        engine
                            .notify(NotificationKind::Error, "Save failed", format!("{:#}", e), None)
                            .await;
                    }
                }
            }

            BridgeCommand::Notify {
                kind,
                title,
                message,
                duration,
            } => {
                engine.notify(kind, title, message, duration).await;
            }

            BridgeCommand::Dismiss(id) => {
                if !engine.dismiss(id).await {
                    println!("No notification {}", id);
                }
            }

            BridgeCommand::Alerts => {
                let visible = engine.notifications().await;
                println!("{}", render::alerts_table(&visible, Utc::now()));
            }

            BridgeCommand::Stats => {
                let stats = engine.stats().await;
                println!("📊 Commands executed: {}", stats.commands_executed);
                println!("   Log lines:         {}", stats.entries);
                println!("   Submitted total:   {}", stats.submitted_total);
            }

            BridgeCommand::Help => println!("{}", help_text()),

            BridgeCommand::Usage(usage) => println!("{}", usage),

            BridgeCommand::Unknown(cmd) => {
                println!("❓ Unknown command: !{}\n   Type !help for available commands.", cmd)
            }

            BridgeCommand::Exit => break,
        }
    }

    engine.shutdown().await?;
    printer.abort();
    Ok(())
}
