// src/progress.rs
use chrono::NaiveDate;
use tracing::{debug, info};

/// Progress reporting for long day-by-day operations (history export).
/// Frontends implement this to surface status; the default methods do nothing.
pub trait Progress {
    /// Called at the start with the number of days to fetch.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one day's page has been fetched and processed.
    fn day_done(&mut self, _date: NaiveDate) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Reports through `tracing`: one debug line per day, an info line every `every` days.
pub struct LogProgress {
    total: usize,
    done: usize,
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self { total: 0, done: 0, every: every.max(1) }
    }

    pub fn done(&self) -> usize {
        self.done
    }
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        info!("fetching {total} day(s)");
    }

    fn log(&mut self, msg: &str) {
        info!("{msg}");
    }

    fn day_done(&mut self, date: NaiveDate) {
        self.done += 1;
        debug!(%date, "day done");
        if self.done % self.every == 0 {
            info!("{}/{} days", self.done, self.total);
        }
    }

    fn finish(&mut self) {
        info!("finished {}/{} days", self.done, self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_progress_counts_days() {
        let mut p = LogProgress::new(0);
        p.begin(3);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        p.day_done(d);
        p.day_done(d.succ_opt().unwrap());
        assert_eq!(p.done(), 2);
        p.finish();
    }
}
