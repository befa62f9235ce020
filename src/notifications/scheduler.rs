use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::data::now;

use super::data::NotificationSettings;
use super::dispatch::Notifier;

/// Fine enough that every wall-clock minute is observed at least once.
const TICK: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledJob {
    DailySummary,
    EveningReminder,
}

/// Date each job last fired, so a job runs at most once per day.
#[derive(Debug, Default)]
pub struct JobLedger {
    daily_summary: Option<NaiveDate>,
    evening_reminder: Option<NaiveDate>,
}

impl JobLedger {
    fn slot(&mut self, job: ScheduledJob) -> &mut Option<NaiveDate> {
        match job {
            ScheduledJob::DailySummary => &mut self.daily_summary,
            ScheduledJob::EveningReminder => &mut self.evening_reminder,
        }
    }

    pub fn last_run(&self, job: ScheduledJob) -> Option<NaiveDate> {
        match job {
            ScheduledJob::DailySummary => self.daily_summary,
            ScheduledJob::EveningReminder => self.evening_reminder,
        }
    }

    pub fn record(&mut self, job: ScheduledJob, date: NaiveDate) {
        *self.slot(job) = Some(date);
    }
}

fn same_minute(a: NaiveTime, b: NaiveTime) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}

/// Jobs whose configured hour and minute match `now` and that have not
/// fired yet today.
pub fn due_jobs(
    settings: &NotificationSettings,
    now: NaiveDateTime,
    ledger: &JobLedger,
) -> Vec<ScheduledJob> {
    let candidates = [
        (
            ScheduledJob::DailySummary,
            settings.send_daily,
            settings.daily_time,
        ),
        (
            ScheduledJob::EveningReminder,
            settings.send_evening,
            settings.evening_time,
        ),
    ];

    candidates
        .iter()
        .filter(|(job, enabled, at)| {
            *enabled && same_minute(now.time(), *at) && ledger.last_run(*job) != Some(now.date())
        })
        .map(|(job, _, _)| *job)
        .collect()
}

async fn run_job(notifier: &Notifier, job: ScheduledJob, today: NaiveDate) {
    let result = match job {
        ScheduledJob::DailySummary => notifier.send_daily_summary(today).await,
        ScheduledJob::EveningReminder => notifier.send_evening_reminder(today).await,
    };

    match result {
        Ok(outcome) if outcome.success => {
            info!(?job, detail = %outcome.detail, "scheduled notification sent")
        }
        Ok(outcome) => warn!(?job, detail = %outcome.detail, "scheduled notification failed"),
        Err(e) => warn!(?job, error = %e, "scheduled notification aborted"),
    }
}

/// Spawns the background loop. Settings are re-read on every tick, so
/// changes to times or flags apply without a restart.
pub fn start(notifier: Notifier) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ledger = JobLedger::default();

        loop {
            ticker.tick().await;

            let now = now();
            let settings = match notifier.settings() {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "could not load notification settings");
                    continue;
                }
            };

            let jobs = due_jobs(&settings, now, &ledger);
            debug!(?jobs, at = %now, "scheduler tick");
            for job in jobs {
                ledger.record(job, now.date());
                run_job(&notifier, job, now.date()).await;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::recurrence::tests::date;

    fn settings() -> NotificationSettings {
        let created = date(2025, 4, 1).and_hms_opt(0, 0, 0).unwrap();
        NotificationSettings {
            id: 1,
            phone_number: "+15550001111".to_string(),
            send_daily: true,
            daily_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            send_evening: true,
            evening_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            created_at: created,
            updated_at: created,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        date(2025, 4, 22).and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn jobs_fire_in_their_configured_minute() {
        let ledger = JobLedger::default();
        assert_eq!(
            due_jobs(&settings(), at(8, 0, 31), &ledger),
            vec![ScheduledJob::DailySummary]
        );
        assert_eq!(
            due_jobs(&settings(), at(19, 0, 0), &ledger),
            vec![ScheduledJob::EveningReminder]
        );
        assert!(due_jobs(&settings(), at(8, 1, 0), &ledger).is_empty());
        assert!(due_jobs(&settings(), at(7, 59, 59), &ledger).is_empty());
    }

    #[test]
    fn jobs_fire_once_per_day() {
        let mut ledger = JobLedger::default();
        ledger.record(ScheduledJob::DailySummary, date(2025, 4, 22));

        assert!(due_jobs(&settings(), at(8, 0, 30), &ledger).is_empty());

        let tomorrow = date(2025, 4, 23).and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(
            due_jobs(&settings(), tomorrow, &ledger),
            vec![ScheduledJob::DailySummary]
        );
    }

    #[test]
    fn disabled_jobs_never_fire() {
        let mut s = settings();
        s.send_daily = false;
        s.evening_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

        assert_eq!(
            due_jobs(&s, at(8, 0, 0), &JobLedger::default()),
            vec![ScheduledJob::EveningReminder]
        );
    }
}
