//! Attitude indicator and compass/altitude instruments with a live
//! key/value table, rendered in software into a `pixels` frame.
//!
//! Each instrument is a plain model that emits drawing commands through the
//! [`Painter`] trait. A [`Scene`] records those commands for inspection, and
//! [`Canvas`] rasterizes them.
//!
//! ```no_run
//! use flight_instruments::{Dashboard, InstrumentCommand, InstrumentConfig};
//! use std::sync::mpsc;
//!
//! let config = InstrumentConfig::builder().title("ADI").build();
//! let mut dashboard = Dashboard::new(config);
//! let (sender, receiver) = mpsc::channel();
//! sender.send(InstrumentCommand::SetAttitude(15.0, -5.0)).unwrap();
//! dashboard.show_with_commands(receiver).unwrap();
//! ```

pub mod app;
pub mod attitude;
pub mod color;
pub mod compass;
pub mod config;
pub mod control;
pub mod error;
pub mod key_value;
pub mod painter;
pub mod raster;
pub mod redraw;
pub mod scene;
pub mod size;

pub use app::{step_for_key, Dashboard, Layout};
pub use attitude::{AttitudeIndicator, PITCH_DISPLAY_LIMIT, PITCH_LIMIT};
pub use color::Color;
pub use compass::Compass;
pub use config::{AttitudeStyle, CompassStyle, InstrumentConfig, TableStyle};
pub use control::{parse_command, InstrumentCommand, StepAction};
pub use error::{InstrumentError, Result};
pub use key_value::KeyValueList;
pub use painter::{Align, Painter, Pen};
pub use raster::{load_font, Canvas};
pub use redraw::RedrawSignal;
pub use scene::{DrawCommand, Scene};
pub use size::SizeContext;
