use chrono::NaiveDate;
use moodcaster_client::{DayRecordRepository, JsonFileDayRecords, Task, TaskLedger};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[test]
fn test_progress_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tasks.json");

    let ledger = TaskLedger::new(JsonFileDayRecords::new(&path), today());
    ledger.mark_done(Task::Checkin).unwrap();
    ledger.mark_done(Task::Generate).unwrap();

    let reopened = TaskLedger::new(JsonFileDayRecords::new(&path), today());
    assert_eq!(reopened.today_points().unwrap(), 15);
    assert_eq!(reopened.streak().unwrap(), 1);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"2026-10-16\""), "{}", raw);
    assert!(raw.contains("\"checkin\""), "{}", raw);
}

#[test]
fn test_corrupt_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "{ definitely not json").unwrap();

    let repo = JsonFileDayRecords::new(&path);
    assert!(repo.all().unwrap().is_empty());

    let ledger = TaskLedger::new(repo, today());
    ledger.mark_done(Task::Post).unwrap();
    assert_eq!(ledger.total_points().unwrap(), 20);
}

#[test]
fn test_missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileDayRecords::new(dir.path().join("absent.json"));
    assert!(repo.get(today()).unwrap().is_none());
}
