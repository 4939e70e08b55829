//! textworld: console front end for the adventure engine
//!
//! Reads commands from stdin, runs them against the world and prints the
//! results. Logging goes to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tw_core::persist::{self, SaveError};
use tw_core::{Console, ResultKind, World, WorldOptions};

/// Explore and build a world of connected rooms
#[derive(Parser, Debug)]
#[command(name = "textworld")]
#[command(author, version, about = "Text adventure world engine", long_about = None)]
struct Args {
    /// Save file to load at start-up and write with `save`
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Options file (rc or JSON format)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Start in edit mode
    #[arg(short = 'e', long = "edit")]
    edit: bool,

    /// Write the effective options to this file in rc format and exit
    #[arg(long = "write-config")]
    write_config: Option<PathBuf>,

    /// Verbose (debug) logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Console reading from stdin and prompting on stdout
struct StdinConsole {
    stdin: io::Stdin,
}

impl StdinConsole {
    fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Console for StdinConsole {
    fn prompt(&mut self, text: &str) {
        let mut out = io::stdout();
        let _ = write!(out, "{}", text);
        let _ = out.flush();
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_options(args: &Args) -> WorldOptions {
    let mut options = match &args.config {
        Some(path) => WorldOptions::load_from_file(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "ignoring options file");
            WorldOptions::default()
        }),
        None => WorldOptions::default(),
    };
    if let Some(file) = &args.file {
        options.file = file.clone();
    }
    if args.edit {
        options.edit = true;
    }
    options
}

fn load(options: &WorldOptions) -> World {
    match persist::load_world(&options.file, options) {
        Ok(world) => world,
        Err(err) => {
            let message = match &err {
                SaveError::Codec(codec) => codec.player_message(),
                _ => "Cannot read save data file.",
            };
            warn!(path = %options.file.display(), %err, "starting a new world");
            println!("{}", message);
            let mut world = World::new(options);
            world.set_save_path(&options.file);
            world
        }
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = load_options(&args);
    if let Some(path) = &args.write_config {
        return options.save_to_file(path).map_err(io::Error::other);
    }

    let mut world = load(&options);
    world.reset_clock(now());
    info!(rooms = world.rooms().len(), edit = world.is_edit_mode(), "world ready");

    let mut console = StdinConsole::new();
    let mut out = io::stdout();
    if !world.intro().is_empty() {
        writeln!(out, "{}", world.intro())?;
    }

    loop {
        if let Some(warning) = world.time_warning(now()) {
            writeln!(out, "{}", warning)?;
        }
        writeln!(out, "{}", world.view())?;
        if let Some(goal) = world.goal_message(now()) {
            writeln!(out, "{}\n", goal)?;
        }

        console.prompt("What do you want to do? ");
        let Some(line) = console.read_line() else {
            writeln!(out)?;
            break;
        };

        let res = world.run_line(&line, &mut console);

        if !res.message.is_empty() {
            writeln!(out, "{}\n", res.message)?;
        }
        if res.kind == ResultKind::Exit {
            break;
        }
    }

    Ok(())
}
