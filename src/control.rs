use crate::error::{InstrumentError, Result};

/// One-unit interactive adjustments, as driven by the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    RollLeft,
    RollRight,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    AltitudeUp,
    AltitudeDown,
    HeightUp,
    HeightDown,
}

/// Command enum for type-safe instrument updates
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentCommand {
    SetRoll(f64),
    SetPitch(f64),
    SetAttitude(f64, f64), // roll, pitch
    SetYaw(f64),
    SetAltitude(f64),
    SetHeight(f64),
    Step(StepAction),
    SetEntry(String, String),
    RemoveEntry(String),
}

/// Parse one text line such as `roll 12.5` or `set GPS fix 3D`.
pub fn parse_command(line: &str) -> Result<InstrumentCommand> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let number = |name: &str| -> Result<f64> {
        rest.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InstrumentError::InvalidCommand(format!("{name} needs a number: {line:?}")))
    };

    match verb.to_ascii_lowercase().as_str() {
        "roll" => Ok(InstrumentCommand::SetRoll(number("roll")?)),
        "pitch" => {
            let pitch = number("pitch")?;
            if pitch.abs() > crate::attitude::PITCH_LIMIT {
                return Err(InstrumentError::InvalidCommand(format!(
                    "pitch {pitch} outside [-90, 90]"
                )));
            }
            Ok(InstrumentCommand::SetPitch(pitch))
        }
        "yaw" | "heading" => Ok(InstrumentCommand::SetYaw(number("yaw")?)),
        "alt" | "altitude" => Ok(InstrumentCommand::SetAltitude(number("altitude")?)),
        "h" | "height" => Ok(InstrumentCommand::SetHeight(number("height")?)),
        "set" => match rest.split_once(char::is_whitespace) {
            Some((key, value)) => Ok(InstrumentCommand::SetEntry(
                key.to_string(),
                value.trim().to_string(),
            )),
            None => Err(InstrumentError::InvalidCommand(format!(
                "set needs a key and a value: {line:?}"
            ))),
        },
        "unset" if !rest.is_empty() => Ok(InstrumentCommand::RemoveEntry(rest.to_string())),
        _ => Err(InstrumentError::InvalidCommand(line.to_string())),
    }
}
