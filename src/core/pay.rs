//! Gross salary projection over a display period.
//!
//! Real entries give the pay earned so far. Working days without data get
//! placeholder entries: zero for days already gone, the average of the real
//! entries for today and later. Those placeholders feed the prediction.

use crate::core::clock::Clock;
use crate::core::observer::{DeferredQueue, Observer};
use crate::core::period::{working_days, working_days_in_month};
use crate::core::repository::{EntryRepository, fetch_period};
use crate::models::entry::Entry;
use crate::models::gross_salary::GrossSalary;
use crate::models::period::Period;
use crate::models::settings::Settings;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

pub const OVERTIME_MULTIPLIER: f64 = 1.5;
const FALLBACK_HOURS_PER_DAY: f64 = 8.0;

/// Hourly rate implied by an entry's own monthly gross pay, the number of
/// working days in its month and its standard hours per day.
pub fn pay_per_hour(entry: &Entry) -> f64 {
    let days = working_days_in_month(entry.date()) as f64;
    let hours_per_day = if entry.standard_worktime_in_seconds > 0 {
        entry.standard_worktime_in_seconds as f64 / 3600.0
    } else {
        FALLBACK_HOURS_PER_DAY
    };
    if days == 0.0 {
        return 0.0;
    }
    entry.gross_pay_per_month as f64 / (days * hours_per_day)
}

/// What one entry earned; overtime hours are paid with [`OVERTIME_MULTIPLIER`].
pub fn entry_gross_pay(entry: &Entry) -> f64 {
    pay_per_hour(entry) * (entry.work_hours() + OVERTIME_MULTIPLIER * entry.overtime_hours())
}

fn average(values: impl Iterator<Item = i64>) -> Option<i64> {
    let (sum, count) = values.fold((0i64, 0i64), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some((sum as f64 / count as f64).round() as i64)
    }
}

pub struct PayManager {
    repository: Rc<dyn EntryRepository>,
    clock: Rc<dyn Clock>,
    settings: Settings,
    period: Period,
    gross_salary: Option<GrossSalary>,
    dirty: Rc<Cell<bool>>,
    updates: DeferredQueue<GrossSalary>,
}

impl PayManager {
    /// The manager listens to the repository's change signal and recomputes
    /// the next time its result is read. The listener only holds a weak
    /// handle, so a dropped manager leaves an inert entry behind in the
    /// repository; one manager per repository is expected.
    pub fn new(
        repository: Rc<dyn EntryRepository>,
        clock: Rc<dyn Clock>,
        settings: Settings,
        period: Period,
    ) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::downgrade(&dirty);
        repository.subscribe(Box::new(move |_: &()| {
            if let Some(flag) = flag.upgrade() {
                flag.set(true);
            }
        }));

        Self {
            repository,
            clock,
            settings,
            period,
            gross_salary: None,
            dirty,
            updates: DeferredQueue::new(),
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Observers receive each new projection on the next [`Self::run_pending`].
    pub fn subscribe(&mut self, observer: Observer<GrossSalary>) {
        self.updates.subscribe(observer);
    }

    /// Deliver projections published since the last call.
    pub fn run_pending(&self) -> usize {
        self.updates.run_pending()
    }

    pub fn set_period(&mut self, period: Period) {
        if period != self.period || self.dirty.get() {
            self.period = period;
            self.refresh();
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        if settings != self.settings {
            self.settings = settings;
            self.refresh();
        }
    }

    /// Current projection, recomputed first if the entries changed.
    pub fn gross_salary(&mut self) -> &GrossSalary {
        if self.dirty.get() || self.gross_salary.is_none() {
            self.refresh();
        }
        // refresh always stores a value
        let period = self.period;
        self.gross_salary.get_or_insert_with(|| GrossSalary {
            period,
            pay_per_hour: 0.0,
            pay_up_to_date: 0.0,
            pay_predicted: None,
            number_of_working_days: 0,
        })
    }

    pub fn refresh(&mut self) {
        let salary = self.generate_gross_data_for_period(&self.period);
        self.dirty.set(false);
        self.updates.post(salary.clone());
        self.gross_salary = Some(salary);
    }

    pub fn generate_gross_data_for_period(&self, period: &Period) -> GrossSalary {
        let today = self.clock.today();

        // a failing store is treated as an empty one
        let real = fetch_period(self.repository.as_ref(), period).unwrap_or_else(|e| {
            warn!(error = %e, "could not fetch entries for the pay projection");
            Vec::new()
        });

        let average_worktime = average(real.iter().map(|e| e.work_time_in_seconds));
        let average_overtime = average(real.iter().map(|e| e.overtime_in_seconds));

        let days = working_days(period);
        let covered: HashSet<_> = real.iter().map(|e| e.date()).collect();

        let mut projected: Vec<Entry> = real.clone();
        for day in days.iter().filter(|d| !covered.contains(d)) {
            let placeholder = if *day < today {
                Entry::placeholder(*day, 0, 0, &self.settings)
            } else {
                Entry::placeholder(
                    *day,
                    average_worktime.unwrap_or(self.settings.work_time_in_seconds),
                    average_overtime.unwrap_or(0),
                    &self.settings,
                )
            };
            projected.push(placeholder);
        }

        let pay_per_hour = if projected.is_empty() {
            0.0
        } else {
            projected.iter().map(pay_per_hour).sum::<f64>() / projected.len() as f64
        };

        let pay_up_to_date: f64 = real.iter().map(entry_gross_pay).sum();

        let fully_realized = days.iter().all(|d| covered.contains(d));
        let pay_predicted = if period.start > today || fully_realized {
            None
        } else {
            Some(projected.iter().map(entry_gross_pay).sum())
        };

        debug!(
            period = %period,
            real = real.len(),
            placeholders = projected.len() - real.len(),
            "gross salary projection"
        );

        GrossSalary {
            period: *period,
            pay_per_hour,
            pay_up_to_date,
            pay_predicted,
            number_of_working_days: days.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::repository::MemoryEntryRepository;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::cell::RefCell;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn noon(date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(12, 0, 0).unwrap()
    }

    fn settings(gross: i64) -> Settings {
        Settings {
            gross_pay_per_month: gross,
            ..Settings::default()
        }
    }

    fn worked(date: NaiveDate, hours: u32, s: &Settings) -> Entry {
        let start = date.and_hms_opt(8, 0, 0).unwrap();
        let finish = date.and_hms_opt(8 + hours, 0, 0).unwrap();
        Entry::from_interval(start, finish, s).unwrap()
    }

    fn manager(repo: &Rc<MemoryEntryRepository>, today: NaiveDate, s: Settings) -> PayManager {
        let clock = Rc::new(ManualClock::new(noon(today)));
        let period = Period::new(d(2023, 11, 1), d(2023, 11, 30));
        PayManager::new(repo.clone(), clock, s, period)
    }

    #[test]
    fn fully_worked_past_month_earns_the_monthly_gross() {
        let s = settings(10_000);
        let repo = Rc::new(MemoryEntryRepository::new());
        let nov = Period::new(d(2023, 11, 1), d(2023, 11, 30));
        for day in working_days(&nov) {
            repo.save(&worked(day, 8, &s)).unwrap();
        }

        let pm = manager(&repo, d(2024, 1, 15), s);
        let g = pm.generate_gross_data_for_period(&nov);

        assert!((g.pay_up_to_date - 10_000.0).abs() < 1e-6);
        assert_eq!(g.pay_predicted, None);
        assert_eq!(g.number_of_working_days, 22);
        assert!((g.pay_per_hour - 10_000.0 / 176.0).abs() < 1e-9);
    }

    #[test]
    fn future_period_without_data() {
        let s = settings(10_000);
        let repo = Rc::new(MemoryEntryRepository::new());
        let pm = manager(&repo, d(2023, 10, 10), s);

        let g = pm.generate_gross_data_for_period(&Period::new(d(2023, 11, 1), d(2023, 11, 30)));
        assert_eq!(g.pay_up_to_date, 0.0);
        assert_eq!(g.pay_predicted, None);
        assert_eq!(g.number_of_working_days, 22);
    }

    #[test]
    fn current_month_predicts_from_average() {
        let s = settings(8_800);
        let repo = Rc::new(MemoryEntryRepository::new());
        // two real days before "today" (Wed 2023-11-08), 6h each
        repo.save(&worked(d(2023, 11, 6), 6, &s)).unwrap();
        repo.save(&worked(d(2023, 11, 7), 6, &s)).unwrap();

        let pm = manager(&repo, d(2023, 11, 8), s);
        let g = pm.generate_gross_data_for_period(&Period::new(d(2023, 11, 1), d(2023, 11, 30)));

        let rate = 8_800.0 / (22.0 * 8.0);
        assert!((g.pay_up_to_date - rate * 12.0).abs() < 1e-6);

        // Nov 1-3 are past and empty → 0; Nov 8..30 has 17 working days at 6h
        let predicted = g.pay_predicted.expect("in-progress month has a prediction");
        assert!((predicted - rate * 6.0 * 19.0).abs() < 1e-6);
    }

    #[test]
    fn prediction_uses_settings_without_history() {
        let s = settings(8_800);
        let repo = Rc::new(MemoryEntryRepository::new());
        let pm = manager(&repo, d(2023, 11, 1), s);

        let g = pm.generate_gross_data_for_period(&Period::new(d(2023, 11, 1), d(2023, 11, 30)));
        assert_eq!(g.pay_up_to_date, 0.0);
        let predicted = g.pay_predicted.unwrap();
        assert!((predicted - 8_800.0).abs() < 1e-6);
    }

    #[test]
    fn overtime_is_paid_one_and_a_half() {
        let s = settings(8_800);
        let repo = Rc::new(MemoryEntryRepository::new());
        let e = worked(d(2023, 11, 6), 10, &s);
        assert_eq!(e.overtime_in_seconds, 2 * 3600);
        repo.save(&e).unwrap();

        let pm = manager(&repo, d(2024, 1, 1), s);
        let g = pm.generate_gross_data_for_period(&Period::new(d(2023, 11, 6), d(2023, 11, 12)));
        let rate = 8_800.0 / 176.0;
        assert!((g.pay_up_to_date - rate * (8.0 + 3.0)).abs() < 1e-6);
    }

    #[test]
    fn repository_changes_trigger_recompute_and_deferred_publication() {
        let s = settings(8_800);
        let repo = Rc::new(MemoryEntryRepository::new());
        let mut pm = manager(&repo, d(2024, 1, 1), s.clone());

        let published = Rc::new(RefCell::new(Vec::new()));
        let p = Rc::clone(&published);
        pm.subscribe(Box::new(move |g: &GrossSalary| p.borrow_mut().push(g.pay_up_to_date)));

        assert_eq!(pm.gross_salary().pay_up_to_date, 0.0);
        assert!(published.borrow().is_empty());
        assert_eq!(pm.run_pending(), 1);

        repo.save(&worked(d(2023, 11, 6), 8, &s)).unwrap();
        let after = pm.gross_salary().pay_up_to_date;
        assert!((after - 400.0).abs() < 1e-6);

        pm.run_pending();
        assert_eq!(published.borrow().len(), 2);
    }

    #[test]
    fn changing_period_republishes() {
        let s = settings(8_800);
        let repo = Rc::new(MemoryEntryRepository::new());
        repo.save(&worked(d(2023, 12, 4), 8, &s)).unwrap();
        let mut pm = manager(&repo, d(2024, 1, 15), s);

        assert_eq!(pm.gross_salary().pay_up_to_date, 0.0);
        pm.set_period(Period::new(d(2023, 12, 1), d(2023, 12, 31)));
        assert_eq!(pm.period().start, d(2023, 12, 1));

        // December 2023 has 21 working days
        let rate = 8_800.0 / (21.0 * 8.0);
        assert!((pm.gross_salary().pay_up_to_date - rate * 8.0).abs() < 1e-6);
        assert_eq!(pm.run_pending(), 2);
    }

    #[test]
    fn dropped_manager_does_not_keep_its_flag_alive() {
        let s = settings(8_800);
        let repo = Rc::new(MemoryEntryRepository::new());
        let pm = manager(&repo, d(2023, 11, 8), s.clone());
        let flag = Rc::downgrade(&pm.dirty);
        drop(pm);

        assert!(flag.upgrade().is_none());
        repo.save(&worked(d(2023, 11, 6), 8, &s)).unwrap();

        let mut pm = manager(&repo, d(2023, 11, 8), s);
        assert!(pm.gross_salary().pay_up_to_date > 0.0);
    }
}
