use flight_instruments::{Color, Dashboard, InstrumentCommand, InstrumentConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = InstrumentConfig::builder()
        .title("Random attitude")
        .size_min(300.0)
        .background_color(Color::new(0x20, 0x20, 0x20))
        .build();

    let mut dashboard = Dashboard::new(config);
    let table = dashboard.table();

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut tick = 0u64;
        loop {
            let commands = [
                InstrumentCommand::SetAttitude(
                    rng.random_range(-45.0..45.0),
                    rng.random_range(-20.0..20.0),
                ),
                InstrumentCommand::SetYaw(rng.random_range(0.0..360.0)),
                InstrumentCommand::SetAltitude(rng.random_range(0.0..500.0)),
                InstrumentCommand::SetHeight(rng.random_range(-5.0..5.0)),
            ];

            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }

            // The table handle is shared and may be written directly.
            tick += 1;
            table.insert("tick", tick.to_string());
            table.insert("satellites", rng.random_range(4..14).to_string());

            thread::sleep(Duration::from_millis(250));
        }
    });

    println!("Displaying attitude, compass and table with random values");
    println!("Arrows roll/pitch, A/D yaw, W/S altitude, PageUp/PageDown height");
    println!("Close the window to exit");

    dashboard.show_with_commands(receiver)?;
    Ok(())
}
