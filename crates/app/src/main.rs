//! Gatepass gate station
//!
//! Signs in as a gate guard and checks visitors in from scanned QR codes
//! read line by line from standard input.

use std::io;

use anyhow::Context;
use chrono::Local;
use gatepass_app::config::AppConfig;
use gatepass_app::notifications::DeliveryReport;
use gatepass_app::state::AppState;
use gatepass_app::station;
use gatepass_app::viewmodel::{auth, manager};
use gatepass_core::notify::NotificationKind;
use gatepass_core::UserRole;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Gatepass");

    let config = AppConfig::load()?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let mut state = AppState::new(config).context("Failed to initialize application")?;
    let guard_name = state.config.station.guard_name.clone();

    let mut reminders = JoinSet::new();
    let today = Local::now().date_naive();
    for invitation in manager::due_reminders(&state, today) {
        let notifier = state.notifier.clone();
        reminders.spawn_on(
            async move { notifier.notify(NotificationKind::Reminder, &invitation).await },
            runtime.handle(),
        );
    }

    auth::login(&mut state, UserRole::GateGuard, guard_name)?;

    let (summary, check_ins) = station::run(&mut state, io::stdin().lock(), runtime.handle())?;

    let (reminded, checked_in) = runtime.block_on(async {
        (drain(reminders).await, drain(check_ins).await)
    });

    tracing::info!(
        scanned = summary.scanned,
        checked_in = summary.checked_in,
        rejected = summary.rejected,
        reminders_sent = reminded,
        check_in_notices_sent = checked_in,
        "Shutting down"
    );

    auth::logout(&mut state)?;
    Ok(())
}

/// Wait for queued deliveries; returns how many reached the visitor
async fn drain(mut tasks: JoinSet<DeliveryReport>) -> usize {
    let mut delivered = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) if report.email_sent || report.sms_sent => delivered += 1,
            Ok(_) => {}
            Err(e) => tracing::error!("Notification task failed: {}", e),
        }
    }
    delivered
}
