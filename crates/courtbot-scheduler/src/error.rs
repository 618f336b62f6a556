use thiserror::Error;

/// Errors that can occur while building a scheduler from configuration.
///
/// All of these are configuration-time failures — they surface before any
/// wait or submission is attempted.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A weekly schedule entry did not match `<Day> <Time> [|<Selector>]`.
    #[error("Invalid schedule entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: String },

    /// The configured submission time is not a valid `HH:MM:SS` reading.
    #[error("Invalid submission time '{0}'")]
    InvalidSubmitTime(String),

    /// Propagated core failure (timezone resolution, config).
    #[error(transparent)]
    Core(#[from] courtbot_core::CoreError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
