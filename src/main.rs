mod console;
mod shell;

use anyhow::Result;
use console::OutputFormat;
use clap::Parser;
use shell::{Outcome, Shell};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

#[derive(Parser)]
#[command(name = "bmpc")]
#[command(about = "Console host for the BlueMap player visibility command")]
struct Cli {
    /// Directory holding config.toml and the message files
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Online players and their permissions [default: <data-dir>/players.toml]
    #[arg(short, long)]
    players: Option<PathBuf>,

    /// How replies are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
    format: OutputFormat,
}

enum Message {
    Line(String),
    Shutdown,
}

/// `BMPC_LOG` wins over the level picked by the `debug` flag.
fn env_filter(debug: bool) -> EnvFilter {
    let default_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("BMPC_LOG")
        .from_env_lossy()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The debug flag has to be known before logging is set up
    let debug = bmpc_core::config::PluginConfig::load(&cli.data_dir)
        .map(|config| config.debug)
        .unwrap_or(false);

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "bmpc.log");
    let (filter, filter_handle) = reload::Layer::new(env_filter(debug));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(logfile.and(std::io::stdout)))
        .init();

    let players_file = cli
        .players
        .unwrap_or_else(|| cli.data_dir.join("players.toml"));
    let mut shell = match Shell::new(&cli.data_dir, &players_file, cli.format) {
        Ok(shell) => shell,
        Err(err) => {
            error!("Could not start: {:#}", err);
            return Err(err);
        }
    };
    if shell.debug() {
        info!("Debug logging of command decisions is enabled");
    }
    shell.on_debug_change(move |debug| {
        if let Err(err) = filter_handle.reload(env_filter(debug)) {
            warn!("Could not change the log level: {}", err);
            return;
        }
        let state = if debug { "enabled" } else { "disabled" };
        info!("Debug logging of command decisions is {}", state);
    });

    let (tx, rx) = mpsc::channel();
    let ctrl_handler_sender = tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrl_handler_sender.send(Message::Shutdown);
    })?;

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Message::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Message::Shutdown);
    });

    info!("Done! Type a command, or 'stop' to quit");
    while let Ok(message) = rx.recv() {
        match message {
            Message::Line(line) => {
                if let Outcome::Stop = shell.handle_line(&line) {
                    break;
                }
            }
            Message::Shutdown => break,
        }
    }
    info!("Shutting down");
    Ok(())
}
