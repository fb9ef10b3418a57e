//! Daily reset triggers: the startup check and the cron-driven loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use cron::Schedule;
use deck_db::reset::ResetCheck;
use deck_db::service::DeckService;
use tokio::task::JoinHandle;

/// Reset now unless the stored marker already holds today's date.
///
/// Failures are logged; the next trigger or restart retries.
pub async fn run_startup_check(service: &DeckService) {
    let today = Local::now().date_naive();
    match service.check_and_run_reset(today).await {
        Ok(ResetCheck::AlreadyDone) => {
            tracing::info!(%today, "daily reset already done today");
        }
        Ok(ResetCheck::Ran(report)) => {
            tracing::info!(
                %today,
                tasks_unchunked = report.tasks_unchunked,
                chunks_removed = report.chunks_removed,
                "startup reset ran"
            );
        }
        Err(error) => tracing::error!(%error, "startup reset check failed"),
    }
}

/// Next fire time strictly after `after`.
#[must_use]
pub fn next_fire(schedule: &Schedule, after: &DateTime<Local>) -> Option<DateTime<Local>> {
    schedule.after(after).next()
}

/// Spawn the recurring reset loop. Each fire resets unconditionally and
/// records the fire date as the last reset date.
pub fn spawn_daily_reset(service: Arc<DeckService>, schedule: Schedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Local::now();
            let Some(next) = next_fire(&schedule, &now) else {
                tracing::warn!("reset schedule has no upcoming fire time; scheduler exiting");
                return;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::debug!(next = %next, wait_secs = wait.as_secs(), "next daily reset scheduled");
            tokio::time::sleep(wait).await;

            let day = next.date_naive();
            if let Err(error) = service.run_daily_reset(day).await {
                tracing::error!(%error, %day, "scheduled daily reset failed; marker left unchanged");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{NaiveDate, TimeZone, Timelike};

    use super::*;

    #[test]
    fn midnight_schedule_fires_next_day() {
        let schedule = Schedule::from_str("0 0 0 * * *").unwrap();
        let after = Local
            .with_ymd_and_hms(2026, 10, 19, 15, 30, 0)
            .earliest()
            .unwrap();
        let next = next_fire(&schedule, &after).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!((next.hour(), next.minute(), next.second()), (0, 0, 0));
    }

    #[tokio::test]
    async fn startup_check_sets_marker() {
        let service = DeckService::new_local(":memory:").await.unwrap();
        run_startup_check(&service).await;
        assert_eq!(
            service.last_reset_date().await.unwrap(),
            Some(Local::now().date_naive())
        );
    }
}
