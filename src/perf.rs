// ==========================================
// Price Catalog - Stage timing
// ==========================================
// StageTimer measures one pipeline stage (name cache load, catalog
// build, export, sink reload) and logs elapsed time, rows handled and
// the SQLite statements issued while it was alive.
// Statement counting needs install_sqlite_tracing on the connection.
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const PERF_SQL_ENV: &str = "PRICE_CATALOG_PERF_SQL";
pub const SLOW_SQL_MS_ENV: &str = "PRICE_CATALOG_SLOW_SQL_MS";

/// Characters of a slow statement quoted in the log
const SLOW_SQL_PREVIEW_CHARS: usize = 400;

static SQL_HOOKS_ON: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SqlTally {
    statements: u64,
    slow: u64,
}

thread_local! {
    static OPEN_STAGES: Cell<u32> = const { Cell::new(0) };
    static TALLY: Cell<SqlTally> = const { Cell::new(SqlTally { statements: 0, slow: 0 }) };
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Single-line statement preview, cut on a character boundary
fn sql_preview(sql: &str, max_chars: usize) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

fn stage_open() -> bool {
    OPEN_STAGES.with(|n| n.get() > 0)
}

fn bump(f: impl FnOnce(&mut SqlTally)) {
    TALLY.with(|t| {
        let mut tally = t.get();
        f(&mut tally);
        t.set(tally);
    });
}

/// Hooks statement counting and the slow-statement log into `conn`.
///
/// On by default in debug builds; `PRICE_CATALOG_PERF_SQL` overrides.
/// Threshold from `PRICE_CATALOG_SLOW_SQL_MS` (default 50 ms debug, 200 ms release).
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let on = env_flag(PERF_SQL_ENV).unwrap_or(cfg!(debug_assertions));
    SQL_HOOKS_ON.store(on, Ordering::Relaxed);

    if !on {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    let threshold = std::env::var(SLOW_SQL_MS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_SQL_MS.store(threshold, Ordering::Relaxed);

    conn.trace(Some(on_statement));
    conn.profile(Some(on_statement_done));
}

fn on_statement(_sql: &str) {
    if SQL_HOOKS_ON.load(Ordering::Relaxed) && stage_open() {
        bump(|t| t.statements = t.statements.saturating_add(1));
    }
}

fn on_statement_done(sql: &str, duration: Duration) {
    if !SQL_HOOKS_ON.load(Ordering::Relaxed) {
        return;
    }
    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    if threshold == 0 || ms < threshold {
        return;
    }

    warn!(
        target: "slow_sql",
        duration_ms = ms,
        sql = %sql_preview(sql, SLOW_SQL_PREVIEW_CHARS),
        "slow statement"
    );
    if stage_open() {
        bump(|t| t.slow = t.slow.saturating_add(1));
    }
}

fn tally() -> SqlTally {
    TALLY.with(|t| t.get())
}

// ==========================================
// StageTimer
// ==========================================

/// Logs one `stage finished` event when dropped.
///
/// ```ignore
/// let mut timer = price_catalog::perf::StageTimer::new("sink_reload");
/// timer.set_rows(rows.len());
/// ```
pub struct StageTimer {
    stage: &'static str,
    rows: usize,
    start: Instant,
    tally_at_start: SqlTally,
}

impl StageTimer {
    pub fn new(stage: &'static str) -> Self {
        OPEN_STAGES.with(|n| n.set(n.get().saturating_add(1)));
        Self {
            stage,
            rows: 0,
            start: Instant::now(),
            tally_at_start: tally(),
        }
    }

    /// Rows (products, entries, catalog lines) the stage handled
    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    /// Statements issued since the timer started, on this thread
    pub fn statements(&self) -> u64 {
        tally()
            .statements
            .saturating_sub(self.tally_at_start.statements)
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let now = tally();
        info!(
            target: "perf",
            stage = self.stage,
            rows = self.rows,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            sql_statements = now.statements.saturating_sub(self.tally_at_start.statements),
            slow_statements = now.slow.saturating_sub(self.tally_at_start.slow),
            "stage finished"
        );
        OPEN_STAGES.with(|n| n.set(n.get().saturating_sub(1)));
    }
}
