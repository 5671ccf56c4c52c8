//! Entry point for **i3switch**.
//!
//! See [`i3switch::cli`] for the command line.
//!
//! Without a subcommand the daemon runs: a Unix-socket listener feeds triggers
//! on a background thread and the main thread handles them one at a time.
//! With an action (e.g. `i3switch switch_tab next wrap`) that single action
//! is carried out and the process exits.

use clap::Parser;
use i3switch::action::Action;
use i3switch::bindings::{BindingRegistry, Trigger};
use i3switch::cli::{Cli, Mode};
use i3switch::config::{search_paths, Config};
use i3switch::daemon::{self, ShutdownToken, SignalGuard};
use i3switch::dispatch::Outcome;
use i3switch::i3::wm::I3Wm;
use i3switch::ipc::listener::UnixSocketListener;
use i3switch::session::Session;
use i3switch::traits::TriggerSource;
use log::{error, info, warn};
use std::path::Path;
use std::sync::mpsc;

/// Load the first config found, falling back to compiled-in defaults.
///
/// An explicit `--config` that cannot be loaded is fatal.
fn load_config(explicit: Option<&Path>) -> Config {
    if let Some(path) = explicit {
        if !path.is_file() {
            error!("config file {} not found", path.display());
            std::process::exit(2);
        }
    }
    match Config::discover(&search_paths(explicit)) {
        Ok(Some((path, cfg))) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Ok(None) => {
            info!("no config file, using defaults");
            Config::default()
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    }
}

fn connect() -> I3Wm {
    match I3Wm::connect() {
        Ok(wm) => wm,
        Err(e) => {
            error!("failed to connect to the window manager: {}", e);
            std::process::exit(1);
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mode = match cli.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("i3switch: {}", e);
            std::process::exit(2);
        }
    };

    let config = load_config(cli.config.as_deref());
    match mode {
        Mode::Daemon => run_daemon(config),
        Mode::ListBindings => list_bindings(&config),
        Mode::Once(action) => std::process::exit(run_once(&action)),
    }
}

fn list_bindings(config: &Config) {
    let registry = BindingRegistry::new(&config.bindings());
    for combo in registry.combos() {
        println!("{}\t{}", combo, registry.source(combo).unwrap_or_default());
    }
}

/// One-shot mode.  Returns the process exit code.
fn run_once(action: &Action) -> i32 {
    let session = Session::new(connect());
    match session.handle(action) {
        Ok(Outcome::Focus(_)) => 0,
        Ok(Outcome::NoOp(reason)) => {
            info!("{}: nothing to do ({})", action, reason);
            0
        }
        Err(e) => {
            eprintln!("i3switch: {}", e);
            1
        }
    }
}

/// Daemon mode.
fn run_daemon(config: Config) {
    let registry = BindingRegistry::new(&config.bindings());
    info!("{} binding(s) loaded", registry.len());

    let session = Session::new(connect());
    let shutdown = ShutdownToken::new();
    let _signals = match SignalGuard::install(shutdown.clone()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("failed to install signal handlers: {}", e);
            None
        }
    };

    let socket_path = config.socket_path();
    let (trigger_tx, trigger_rx) = mpsc::channel::<Trigger>();
    let listener = spawn_trigger_sources(&socket_path, trigger_tx, shutdown.clone());

    info!("i3switch running");
    let handled = daemon::run(&session, &registry, &trigger_rx, &shutdown);
    info!("handled {} trigger(s), exiting", handled);

    // The listener is blocked in accept(); poke it so it sees the token and
    // removes its socket.
    shutdown.cancel();
    if std::os::unix::net::UnixStream::connect(&socket_path).is_ok() {
        let _ = listener.join();
    }
}

//  Helpers

fn spawn_trigger_sources(
    path: &Path,
    tx: mpsc::Sender<Trigger>,
    shutdown: ShutdownToken,
) -> std::thread::JoinHandle<()> {
    let path = path.to_path_buf();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path).with_shutdown(shutdown);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    })
}
