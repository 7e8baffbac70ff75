use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstrumentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Surface error: {0}")]
    Surface(#[from] pixels::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

pub type Result<T> = std::result::Result<T, InstrumentError>;
