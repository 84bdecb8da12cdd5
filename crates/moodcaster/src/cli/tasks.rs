//! Task ledger command handler.

use moodcaster_client::{JsonFileDayRecords, LedgerError, Task, TaskLedger};
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// Opens the ledger file for today, using the default location when `path` is `None`.
pub fn open_ledger(path: Option<PathBuf>) -> TaskLedger<JsonFileDayRecords> {
    let path = path.unwrap_or_else(JsonFileDayRecords::default_path);
    TaskLedger::for_today(JsonFileDayRecords::new(path))
}

/// Handle the `tasks` command
pub fn handle_tasks_command(path: Option<PathBuf>) -> Result<(), LedgerError> {
    let ledger = open_ledger(path);
    let today = ledger.ensure_today()?;

    println!("Tasks for {}", ledger.today());
    for task in Task::iter() {
        let mark = if today.is_done(task) { "x" } else { " " };
        println!("  [{}] {:<18} {:>3} pts", mark, task.title(), task.points());
    }
    println!("Casts posted today: {}", today.posted_count);
    println!("Today: {} pts", today.points());
    println!("Total: {} pts", ledger.total_points()?);
    println!("Streak: {} day(s)", ledger.streak()?);
    Ok(())
}
