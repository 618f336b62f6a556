//! `courtbot-notify` — run-report delivery.
//!
//! Renders a [`courtbot_scheduler::RunReport`] as text and delivers it to
//! the configured collaborators: the club's group chat (HTTP gateway) and a
//! report email (SMTP). Both channels are best-effort — a delivery failure
//! is logged and never changes the run's outcome or exit code.

pub mod chat;
pub mod email;
pub mod error;
pub mod report;

pub use chat::ChatNotifier;
pub use email::EmailNotifier;
pub use error::{NotifyError, Result};
pub use report::{render_text, subject_line};
