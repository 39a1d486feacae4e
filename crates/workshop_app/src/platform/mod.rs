//! Terminal front-end: argument handling, startup and the three modes.
mod app;
mod assessment;
mod config;
mod effects;
mod input;
mod modules;
mod persistence;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context, Result};
use workshop_engine::{EngineHandle, LocalStore};
use workshop_logging::{set_session_tag, workshop_info};

use self::app::ChatApp;
use self::config::AppConfig;
use self::effects::EffectRunner;

const USAGE: &str = "\
Verwendung: workshop_app [chat|assessment|modules] [--config <datei>] [--new]

  chat        Businessplan im Dialog erarbeiten (Standard)
  assessment  GZ-Check mit Vorschau der Prüfbereiche
  modules     Workshop-Module mit Coaching
  --config    Pfad zur Konfiguration (Standard: ./workshop.ron)
  --new       neue Sitzung statt der letzten fortsetzen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Chat,
    Assessment,
    Modules,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliArgs {
    mode: Mode,
    config: Option<PathBuf>,
    new_session: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut mode_seen = false;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let Some(path) = args.next() else {
                    bail!("--config needs a path");
                };
                parsed.config = Some(PathBuf::from(path));
            }
            "--new" => parsed.new_session = true,
            "--help" | "-h" => parsed.help = true,
            mode if !mode_seen && !mode.starts_with('-') => {
                parsed.mode = match mode {
                    "chat" => Mode::Chat,
                    "assessment" | "check" => Mode::Assessment,
                    "modules" | "workshop" => Mode::Modules,
                    other => bail!("unknown mode '{other}'"),
                };
                mode_seen = true;
            }
            other => bail!("unexpected argument '{other}'"),
        }
    }
    Ok(parsed)
}

pub fn run_app() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = AppConfig::load(args.config.as_deref())?;
    workshop_logging::initialize(config.log_destination(), config.log_level());
    workshop_info!("starting in {:?} mode against {}", args.mode, config.api_base_url);

    let store = LocalStore::new(config.data_dir.clone());
    let session_id = match store.last_session() {
        Some(last) if !args.new_session => last,
        _ => uuid::Uuid::new_v4().to_string(),
    };
    set_session_tag(&session_id);

    let engine = EngineHandle::new(config.engine_config()).context("cannot start engine")?;
    let runner = EffectRunner::new(engine, store, config.document_title.clone());
    let lines = spawn_line_reader();

    match args.mode {
        Mode::Chat => {
            let mut app = ChatApp::new(runner, session_id);
            app.start(&config);
            app.run(lines)
        }
        Mode::Assessment => assessment::run_assessment(&runner, &session_id, &lines),
        Mode::Modules => modules::run_modules(&runner, &session_id, &lines),
    }
}

fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Prints `prompt` and blocks for the next input line; `None` on end of input.
fn read_line(lines: &mpsc::Receiver<String>, prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    lines.recv().ok()
}
