//! `courtbot-portal` — concrete booking drivers.
//!
//! [`PortalDriver`] talks to the member portal's reservation endpoint over
//! HTTP; [`DryRunDriver`] logs what would be booked and touches nothing.
//! Both implement the [`courtbot_core::BookingDriver`] seam the scheduler
//! drives.

pub mod dry_run;
pub mod portal;

pub use dry_run::DryRunDriver;
pub use portal::PortalDriver;
