use paytimer::core::repository::EntryRepository;
use paytimer::db::repository::SqliteEntryRepository;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::Sandbox;

#[test]
fn init_creates_config_and_database() {
    let sb = Sandbox::new();
    sb.pt()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(sb.config_file().exists());
    assert!(std::path::Path::new(&sb.db).exists());
}

#[test]
fn test_mode_init_skips_config_file() {
    let sb = Sandbox::new();
    sb.init();
    assert!(!sb.config_file().exists());
}

#[test]
fn add_and_list_entries() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");
    sb.add("2023-11-07", "08:00", "21:00");

    sb.pt()
        .args(["list", "--range", "month", "--date", "2023-11-15"])
        .assert()
        .success()
        .stdout(contains("2023-11-06"))
        .stdout(contains("08h 00m"))
        .stdout(contains("02h 00m"))
        .stdout(contains("2 entries"));

    // the previous month is empty
    sb.pt()
        .args(["list", "--date", "2023-11-15", "--offset", "-1"])
        .assert()
        .success()
        .stdout(contains("No entries"));
}

#[test]
fn add_rejects_finish_before_start() {
    let sb = Sandbox::new();
    sb.init();
    sb.pt()
        .args(["add", "2023-11-06", "--in", "17:00", "--out", "09:00"])
        .assert()
        .failure()
        .stderr(contains("Invalid entry"));
}

#[test]
fn add_rejects_bad_date() {
    let sb = Sandbox::new();
    sb.init();
    sb.pt()
        .args(["add", "2023-13-06", "--in", "09:00", "--out", "17:00"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn session_lifecycle() {
    let sb = Sandbox::new();
    sb.init();

    sb.pt()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("not started"));

    sb.pt()
        .arg("start")
        .assert()
        .success()
        .stdout(contains("Work session started"));

    sb.pt()
        .arg("start")
        .assert()
        .success()
        .stdout(contains("already running"));

    sb.pt()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("running"));

    sb.pt()
        .arg("pause")
        .assert()
        .success()
        .stdout(contains("paused"));

    sb.pt()
        .arg("resume")
        .assert()
        .success()
        .stdout(contains("resumed"));

    sb.pt()
        .arg("stop")
        .assert()
        .success()
        .stdout(contains("Work session saved"));

    sb.pt()
        .arg("stop")
        .assert()
        .success()
        .stdout(contains("No active work session"));

    let repo = SqliteEntryRepository::open(&sb.db).unwrap();
    assert_eq!(repo.fetch(None, None, true, None).unwrap().len(), 1);
}

#[test]
fn pause_without_session_warns() {
    let sb = Sandbox::new();
    sb.init();
    sb.pt()
        .arg("pause")
        .assert()
        .success()
        .stdout(contains("No running work session"));
}

#[test]
fn config_updates_are_persisted() {
    let sb = Sandbox::new();
    sb.init();

    sb.pt()
        .args([
            "config",
            "--work-time",
            "7h30m",
            "--gross-pay",
            "8800",
            "--first-weekday",
            "sun",
            "--print",
        ])
        .assert()
        .success()
        .stdout(contains("07h 30m"))
        .stdout(contains("8800"))
        .stdout(contains("sunday"));

    let content = std::fs::read_to_string(sb.config_file()).unwrap();
    assert!(content.contains("work_time_in_seconds: 27000"));
    assert!(content.contains("gross_pay_per_month: 8800"));
}

#[test]
fn config_rejects_bad_values() {
    let sb = Sandbox::new();
    sb.init();

    sb.pt()
        .args(["config", "--work-time", "eight"])
        .assert()
        .failure()
        .stderr(contains("Invalid duration"));

    sb.pt()
        .args(["config", "--first-weekday", "someday"])
        .assert()
        .failure()
        .stderr(contains("Invalid weekday"));
}

#[test]
fn pay_reports_earnings() {
    let sb = Sandbox::new();
    sb.init();
    sb.pt()
        .args(["config", "--gross-pay", "8800"])
        .assert()
        .success();
    sb.add("2023-11-06", "09:00", "17:00");

    sb.pt()
        .args(["pay", "--range", "month", "--date", "2023-11-06"])
        .assert()
        .success()
        .stdout(contains("Gross salary 2023-11-01 → 2023-11-30"))
        .stdout(contains("400.00"))
        .stdout(contains("22"));
}

#[test]
fn pay_shows_net_when_enabled() {
    let sb = Sandbox::new();
    sb.init();
    sb.pt()
        .args(["config", "--gross-pay", "10000", "--net-pay", "true"])
        .assert()
        .success();
    sb.add("2023-11-06", "09:00", "17:00");

    sb.pt()
        .args(["pay", "--date", "2023-11-06"])
        .assert()
        .success()
        .stdout(contains("Net per month"))
        .stdout(contains("7146.91"));
}

#[test]
fn stats_draw_a_bucket_per_day() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");
    sb.add("2023-11-07", "09:00", "18:00");

    sb.pt()
        .args(["stats", "--range", "week", "--date", "2023-11-08"])
        .assert()
        .success()
        .stdout(contains("Mon 06"))
        .stdout(contains("Sun 12"))
        .stdout(contains("09h 00m"))
        .stdout(contains("Entries"));
}

#[test]
fn export_csv_and_json() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");
    sb.add("2023-12-04", "09:00", "17:00");

    let csv = sb.out_file("entries.csv");
    sb.pt()
        .args(["export", "--format", "csv", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));
    let content = std::fs::read_to_string(&csv).unwrap();
    assert!(content.starts_with("id,date,start,finish"));
    assert_eq!(content.lines().count(), 3);

    let json = sb.out_file("entries.json");
    sb.pt()
        .args([
            "export", "--format", "json", "--file", &json, "--range", "month", "--date",
            "2023-12-01",
        ])
        .assert()
        .success();
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["date"], "2023-12-04");
}

#[test]
fn export_does_not_overwrite_without_confirmation() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");

    let csv = sb.out_file("entries.csv");
    std::fs::write(&csv, "keep me").unwrap();

    sb.pt()
        .args(["export", "--file", &csv])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));
    assert_eq!(std::fs::read_to_string(&csv).unwrap(), "keep me");

    sb.pt()
        .args(["export", "--file", &csv, "--force"])
        .assert()
        .success();
    assert_ne!(std::fs::read_to_string(&csv).unwrap(), "keep me");
}

#[test]
fn edit_and_delete_by_id_prefix() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");

    let id = {
        let repo = SqliteEntryRepository::open(&sb.db).unwrap();
        repo.fetch_newest().unwrap().unwrap().short_id()
    };

    sb.pt()
        .args(["edit", &id, "--out", "13:00"])
        .assert()
        .success()
        .stdout(contains("updated"))
        .stdout(contains("04h 00m"));

    {
        let repo = SqliteEntryRepository::open(&sb.db).unwrap();
        let all = repo.fetch(None, None, true, None).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].work_time_in_seconds, 4 * 3600);
    }

    // answering no keeps the entry
    sb.pt()
        .args(["del", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("cancelled"));

    sb.pt()
        .args(["del", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    sb.pt()
        .args(["del", &id])
        .assert()
        .failure()
        .stderr(contains("No entry found"));
}

#[test]
fn delete_all_entries() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");
    sb.add("2023-11-07", "09:00", "17:00");

    sb.pt()
        .args(["del", "--all"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(contains("All entries have been deleted"));

    let repo = SqliteEntryRepository::open(&sb.db).unwrap();
    assert!(repo.fetch(None, None, true, None).unwrap().is_empty());
}

#[test]
fn log_lists_writes() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("2023-11-06", "09:00", "17:00");

    sb.pt()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("Internal log"))
        .stdout(contains("init").and(contains("save")))
        .stdout(contains("migration_applied"));
}
