//! `courtbot-core` — shared types, configuration, and the driver seam.
//!
//! Everything the other crates agree on lives here: the parsed weekly
//! schedule types, the fully resolved [`BookingRequest`], the
//! [`BookingDriver`] collaborator trait, and the TOML + env configuration
//! loader.

pub mod config;
pub mod driver;
pub mod error;
pub mod types;

pub use config::CourtbotConfig;
pub use driver::{BookingDriver, DriverError};
pub use error::{CoreError, Result};
pub use types::{BookingRequest, CourtSelector, Invocation, ReservationOutcome, WeeklySlot};
