//! Muse Player - headless playback from the terminal
//!
//! This is the composition root. It:
//! 1. Loads the YAML config and the track catalog
//! 2. Creates one `PlayerController` around a simulated audio output
//! 3. Reads commands from stdin on a background thread (flume bridge)
//! 4. Pumps output events between commands
//! 5. Disposes the controller and saves preferences on exit
//!
//! ## Command line flags
//!
//! - `--config <path>`: config file (default: `~/.config/muse/config.yaml`)
//! - `--catalog <path>`: YAML list of tracks (default: a built-in demo list)

mod catalog;
mod commands;
mod sim_output;

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use flume::RecvTimeoutError;

use commands::{Command, HELP};
use muse_core::config::{self, MuseConfig};
use muse_core::player::{PlayerController, PlayerSnapshot};
use muse_core::Track;
use sim_output::SimOutput;

/// How long to wait for input before pumping output events again
const PUMP_INTERVAL: Duration = Duration::from_millis(100);

struct Args {
    config_path: PathBuf,
    catalog_path: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut parsed = Args {
        config_path: config::default_config_path(),
        catalog_path: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config_path = args.next().map(PathBuf::from).context("--config needs a path")?;
            }
            "--catalog" => {
                parsed.catalog_path = Some(args.next().map(PathBuf::from).context("--catalog needs a path")?);
            }
            other => anyhow::bail!("Unknown argument '{}'", other),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;
    log::info!("muse-player starting up");

    let mut config: MuseConfig = config::load_config(&args.config_path);
    log::info!("Config loaded from {:?}", args.config_path);

    let catalog = match &args.catalog_path {
        Some(path) => catalog::load_catalog(path)?,
        None => {
            log::info!("No --catalog given, using the demo catalog");
            catalog::demo_catalog()
        }
    };

    let mut player = PlayerController::create(SimOutput::new(), &config.player);
    let snapshots = player.subscribe();

    let (line_tx, line_rx) = flume::bounded::<String>(64);
    std::thread::Builder::new()
        .name("muse-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to start input thread")?;

    println!("Muse Player - {} tracks. Type 'help' for commands.", catalog.len());

    let mut now_playing: Option<String> = None;
    loop {
        match line_rx.recv_timeout(PUMP_INTERVAL) {
            Ok(line) => match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => run(command, &mut player, &catalog),
                Ok(None) => {}
                Err(e) => println!("{}", e),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        player.pump_events();
        for snapshot in snapshots.try_iter() {
            announce(&snapshot, &mut now_playing);
        }
        if let Some(message) = player.take_error() {
            println!("Playback error: {}", message);
        }
    }

    config.player = player.dispose();
    config::save_config(&config, &args.config_path)?;
    log::info!("Preferences saved to {:?}", args.config_path);
    Ok(())
}

fn run(command: Command, player: &mut PlayerController<SimOutput>, catalog: &[Track]) {
    let find = |id: &str| {
        let track = catalog.iter().find(|t| t.id == id).cloned();
        if track.is_none() {
            println!("No track '{}' in the catalog", id);
        }
        track
    };

    match command {
        Command::List => {
            for track in catalog {
                println!("  {:<12} {:<28} {}", track.id, track.title, format_time(track.duration));
            }
        }
        Command::Play(id) => {
            if let Some(track) = find(&id) {
                player.play(track);
            }
        }
        Command::Pause => player.pause(),
        Command::Resume => player.resume(),
        Command::Toggle => player.toggle_play_pause(),
        Command::Stop => player.stop(),
        Command::Next => player.play_next(),
        Command::Prev => player.play_previous(),
        Command::Queue(id) => {
            if let Some(track) = find(&id) {
                if !player.add_to_queue(track) {
                    println!("'{}' is already queued", id);
                }
            }
        }
        Command::Unqueue(id) => {
            if player.remove_from_queue(&id) == 0 {
                println!("'{}' is not queued", id);
            }
        }
        Command::Move(from, to) => {
            if let Err(e) = player.move_in_queue(from, to) {
                println!("{}", e);
            }
        }
        Command::Clear => player.clear_queue(),
        Command::PlayAll(id) => {
            if let Some(track) = find(&id) {
                player.play_track_with_queue(track, catalog.to_vec());
            }
        }
        Command::Seek(position) => player.seek(position),
        Command::Volume(volume) => player.set_volume(volume),
        Command::Mute => player.toggle_mute(),
        Command::Rate(rate) => player.set_playback_rate(rate),
        Command::Loop => {
            let looping = !player.state().is_looping();
            player.set_looping(looping);
        }
        Command::Shuffle => {
            let shuffling = !player.state().is_shuffling();
            player.set_shuffling(shuffling);
        }
        Command::Status => print_status(&player.snapshot()),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

/// Print a line when the loaded track changes
fn announce(snapshot: &PlayerSnapshot, now_playing: &mut Option<String>) {
    let current = snapshot.state.current_track_id().map(str::to_string);
    if current != *now_playing {
        if let Some(track) = snapshot.state.current_track() {
            println!("Now playing: {} ({})", track.title, track.id);
        }
        *now_playing = current;
    }
}

fn print_status(snapshot: &PlayerSnapshot) {
    let state = &snapshot.state;
    match state.current_track() {
        Some(track) => println!(
            "{} {} [{} / {}]",
            if state.is_playing() { "▶" } else { "⏸" },
            track.title,
            format_time(state.current_time()),
            format_time(state.duration())
        ),
        None => println!("Nothing loaded"),
    }
    println!(
        "volume {:.2}{}  rate {:.2}x  loop {}  shuffle {}",
        state.volume(),
        if state.is_muted() { " (muted)" } else { "" },
        state.playback_rate(),
        if state.is_looping() { "on" } else { "off" },
        if state.is_shuffling() { "on" } else { "off" },
    );
    if snapshot.queue.is_empty() {
        println!("queue: empty");
    } else {
        println!("queue:");
        for (i, track) in snapshot.queue.iter().enumerate() {
            println!("  {}. {} ({})", i, track.title, track.id);
        }
    }
}

fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(75.9), "1:15");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_preferences_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muse").join("config.yaml");

        let mut config: MuseConfig = config::load_config(&path);
        let mut player = PlayerController::create(SimOutput::new(), &config.player);
        player.set_volume(0.4);
        player.toggle_mute();
        player.set_playback_rate(1.5);
        config.player = player.dispose();
        config::save_config(&config, &path).unwrap();

        let reloaded: MuseConfig = config::load_config(&path);
        let player = PlayerController::create(SimOutput::new(), &reloaded.player);
        assert_eq!(player.state().volume(), 0.4);
        assert!(player.state().is_muted());
        assert_eq!(player.state().playback_rate(), 1.5);
    }
}
