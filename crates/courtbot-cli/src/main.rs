use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::Parser;
use tracing::{info, warn};

use courtbot_core::{BookingDriver, CourtbotConfig, Invocation};
use courtbot_notify::{render_text, subject_line, ChatNotifier, EmailNotifier};
use courtbot_portal::{DryRunDriver, PortalDriver};
use courtbot_scheduler::{timing::resolve_local, RunReport, Scheduler};

/// One run of the recurring court-booking scheduler.
#[derive(Parser)]
#[command(name = "courtbot")]
#[command(about = "Match today's weekly slots, wait for the submission window, book courts")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Civil invocation timestamp in the operating zone,
    /// "YYYY-MM-DD HH:MM[:SS]". Omitted: manual run (zero wait, today basis).
    #[arg(long)]
    at: Option<String>,

    /// Rehearse without touching the portal or sending notifications
    #[arg(long)]
    dry_run: bool,

    /// Skip the chat/email report for this run
    #[arg(long)]
    no_notify: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtbot=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: explicit path > COURTBOT_CONFIG env > ~/.courtbot/courtbot.toml
    let config_path = cli.config.clone().or_else(|| std::env::var("COURTBOT_CONFIG").ok());
    let config = CourtbotConfig::load(config_path.as_deref()).context("loading configuration")?;

    // Any malformed schedule entry aborts here — before any wait or
    // submission is attempted.
    let scheduler = Scheduler::from_config(&config).context("parsing weekly schedule")?;
    info!(slots = scheduler.slots().len(), tz = %scheduler.operating_tz(), "schedule loaded");

    let invocation = match &cli.at {
        Some(at) => Invocation::Scheduled(
            parse_invocation(at, scheduler.operating_tz())
                .with_context(|| format!("parsing --at '{at}'"))?,
        ),
        None => Invocation::Manual,
    };

    let driver: Box<dyn BookingDriver> = if cli.dry_run {
        Box::new(DryRunDriver)
    } else {
        Box::new(PortalDriver::new(&config.portal).context("building portal driver")?)
    };
    info!(driver = driver.name(), "booking driver ready");

    // Ctrl-C flips the shutdown channel; a run cancelled mid-wait exits
    // cleanly without submitting anything.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received — cancelling run");
            let _ = shutdown_tx.send(true);
        }
    });

    let report = scheduler.run(invocation, driver.as_ref(), shutdown_rx).await;

    let text = render_text(&report);
    println!("{text}");

    if !cli.no_notify && !cli.dry_run {
        deliver_report(&config, &report, &text).await;
    }

    // All matched requests attempted (whatever their individual outcomes),
    // nothing due, and clean cancellation all exit 0; only a portal that was
    // never reachable is a nonzero run.
    if report.driver_unavailable() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolve a civil "YYYY-MM-DD HH:MM[:SS]" reading in the operating zone.
fn parse_invocation(s: &str, tz: chrono_tz::Tz) -> anyhow::Result<chrono::DateTime<chrono_tz::Tz>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))?;
    Ok(resolve_local(tz, naive))
}

/// Best-effort delivery to the configured channels; failures are logged and
/// never change the exit code.
async fn deliver_report(config: &CourtbotConfig, report: &RunReport, text: &str) {
    if let Some(chat_cfg) = config.notify.chat.clone() {
        match ChatNotifier::new(chat_cfg).send(text).await {
            Ok(()) => {}
            Err(e) => warn!(error = %e, "chat notification failed"),
        }
    }

    if let Some(email_cfg) = &config.notify.email {
        let sent = match EmailNotifier::new(email_cfg) {
            Ok(notifier) => notifier.send(&subject_line(report), text).await,
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            warn!(error = %e, "email notification failed");
        }
    }
}
