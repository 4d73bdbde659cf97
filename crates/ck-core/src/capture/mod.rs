//! Capture pipeline vocabulary: outcomes, errors and change signals.
mod error;
mod outcome;

pub use error::{CaptureError, ClipboardReadError};
pub use outcome::{CaptureOutcome, ClipboardChangeSignal};
