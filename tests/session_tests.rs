//! Library-level scenarios: a work session persisted in SQLite feeding the
//! pay projection.

use chrono::{NaiveDate, NaiveDateTime};
use paytimer::core::clock::ManualClock;
use paytimer::core::notify::LogNotifier;
use paytimer::core::pay::PayManager;
use paytimer::core::repository::EntryRepository;
use paytimer::core::session::{SessionEvent, TimerManager};
use paytimer::core::session_store::SessionStore;
use paytimer::db::repository::SqliteEntryRepository;
use paytimer::models::gross_salary::GrossSalary;
use paytimer::models::period::Period;
use paytimer::models::settings::Settings;
use paytimer::models::timer_state::TimerState;
use std::cell::RefCell;
use std::rc::Rc;

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 11, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn settings() -> Settings {
    Settings {
        gross_pay_per_month: 8_800,
        ..Settings::default()
    }
}

#[test]
fn finished_session_updates_pay_projection() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("pay.sqlite");
    let repo = Rc::new(SqliteEntryRepository::open(db.to_str().unwrap()).unwrap());
    let clock = Rc::new(ManualClock::new(at(6, 9, 0)));

    let november = Period::new(
        NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
    );
    let mut pay = PayManager::new(repo.clone(), clock.clone(), settings(), november);
    let published = Rc::new(RefCell::new(Vec::<GrossSalary>::new()));
    let p = Rc::clone(&published);
    pay.subscribe(Box::new(move |g: &GrossSalary| p.borrow_mut().push(g.clone())));

    assert_eq!(pay.gross_salary().pay_up_to_date, 0.0);

    let mut manager = TimerManager::new(
        settings(),
        repo.clone(),
        clock.clone(),
        Box::new(LogNotifier::default()),
    );
    let saved = Rc::new(RefCell::new(0));
    let s = Rc::clone(&saved);
    manager.subscribe(Box::new(move |ev: &SessionEvent| {
        if let SessionEvent::EntrySaved(_) = ev {
            *s.borrow_mut() += 1;
        }
    }));

    manager.start();
    manager.enter_background();
    // a whole day away: work and overtime both fill up
    clock.advance(24 * 3600);
    manager.enter_foreground();

    assert_eq!(manager.state(), TimerState::Finished);
    assert_eq!(*saved.borrow(), 1);

    let entries = repo.fetch(None, None, true, None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].work_time_in_seconds, 8 * 3600);
    assert_eq!(entries[0].overtime_in_seconds, 2 * 3600);
    assert_eq!(entries[0].finish, at(6, 19, 0));

    // 8h + 2h × 1.5 at 50/h
    let up_to_date = pay.gross_salary().pay_up_to_date;
    assert!((up_to_date - 550.0).abs() < 1e-6);

    assert_eq!(pay.run_pending(), 2);
    assert_eq!(published.borrow().len(), 2);
}

#[test]
fn session_survives_between_processes() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("s.sqlite");
    let db = db.to_str().unwrap();
    let store = SessionStore::new(format!("{db}.session.json"));
    let clock = Rc::new(ManualClock::new(at(7, 8, 0)));

    // first "process": start and leave
    {
        let repo = Rc::new(SqliteEntryRepository::open(db).unwrap());
        let mut m = store.load(&settings(), repo, clock.clone(), Box::new(LogNotifier::default()));
        m.start();
        store.save(&mut m).unwrap();
    }

    clock.advance(8 * 3600 + 30 * 60);

    // second "process": the session is in overtime
    {
        let repo = Rc::new(SqliteEntryRepository::open(db).unwrap());
        let notifier = Box::new(LogNotifier::default());
        let mut m = store.load(&settings(), repo.clone(), clock.clone(), notifier);
        assert_eq!(m.state(), TimerState::Running);
        assert_eq!(m.work_timer().counter(), 8 * 3600);
        assert_eq!(m.overtime_timer().unwrap().counter(), 30 * 60);

        m.stop();
        store.save(&mut m).unwrap();

        let e = repo.fetch_newest().unwrap().unwrap();
        assert_eq!(e.overtime_in_seconds, 30 * 60);
        assert_eq!(e.start, at(7, 8, 0));
    }
}
