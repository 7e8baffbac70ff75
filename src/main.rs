use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use flight_instruments::{parse_command, Dashboard, InstrumentCommand, InstrumentConfig};
use rand::Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

struct Options {
    title: Option<String>,
    font: Option<PathBuf>,
    show_altitude: bool,
    demo: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Options {
    let mut options = Options {
        title: None,
        font: None,
        show_altitude: true,
        demo: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => options.title = args.next(),
            "--font" => options.font = args.next().map(PathBuf::from),
            "--no-altitude" => options.show_altitude = false,
            "--demo" => options.demo = true,
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }
    options
}

/// Forward each stdin line as a command until stdin closes.
fn spawn_stdin_reader(sender: Sender<InstrumentCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "stdin read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                Err(err) => warn!(%err, "skipping line"),
            }
        }
        debug!("stdin closed");
    });
}

/// Random-walk the flight state at 20 Hz.
fn spawn_demo(sender: Sender<InstrumentCommand>) {
    thread::spawn(move || {
        let mut rng = rand::rng();
        let (mut roll, mut pitch, mut yaw, mut altitude) = (0.0_f64, 0.0_f64, 0.0_f64, 100.0_f64);
        loop {
            roll = (roll + rng.random_range(-2.0..2.0)).clamp(-60.0, 60.0);
            pitch = (pitch + rng.random_range(-1.0..1.0)).clamp(-30.0, 30.0);
            yaw = (yaw + rng.random_range(-1.5..1.5)).rem_euclid(360.0);
            altitude = (altitude + rng.random_range(-0.5..0.5)).max(0.0);

            let commands = [
                InstrumentCommand::SetAttitude(roll, pitch),
                InstrumentCommand::SetYaw(yaw),
                InstrumentCommand::SetAltitude(altitude),
                InstrumentCommand::SetHeight(altitude - 100.0),
                InstrumentCommand::SetEntry("roll".into(), format!("{roll:.1}")),
                InstrumentCommand::SetEntry("pitch".into(), format!("{pitch:.1}")),
                InstrumentCommand::SetEntry("yaw".into(), format!("{yaw:.1}")),
            ];
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = parse_args(env::args().skip(1));
    let config = InstrumentConfig::builder()
        .maybe_title(options.title)
        .maybe_font_path(options.font)
        .show_altitude_panel(options.show_altitude)
        .build();

    let (sender, receiver) = mpsc::channel();
    spawn_stdin_reader(sender.clone());
    if options.demo {
        info!("demo mode enabled");
        spawn_demo(sender);
    }

    let mut dashboard = Dashboard::new(config);
    dashboard.show_with_commands(receiver)?;
    Ok(())
}
