//! CSV loader for the two source tables.
//!
//! Expects a data directory holding:
//! - `occurrences.csv` — `date,word[,mind_state]`, one row per recorded word
//! - `daystats.csv`    — `date,mind_state,sleep_hours`, one row per day
//!
//! Dates are `YYYY-MM-DD`, mind states are integer scores in [-3, 3]. A
//! header line is recognized by its leading `date` field and skipped; blank
//! lines are skipped. Any malformed row aborts the whole load — there is no
//! partial startup mode. The two files are read on scoped threads and joined
//! before the store is built, so either failure fails the startup.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::{CoreError, DayStat, MindState, Occurrence, RecordStore};

const OCCURRENCES_FILE: &str = "occurrences.csv";
const DAY_STATS_FILE: &str = "daystats.csv";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: expected at least {expected} fields")]
    MissingField {
        file: &'static str,
        line: usize,
        expected: usize,
    },

    #[error("{file}:{line}: invalid date \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate {
        file: &'static str,
        line: usize,
        value: String,
    },

    #[error("{file}:{line}: invalid mind state \"{value}\" (expected integer in -3..=3)")]
    InvalidMindState {
        file: &'static str,
        line: usize,
        value: String,
    },

    #[error("{file}:{line}: invalid sleep hours \"{value}\" (expected non-negative number)")]
    InvalidSleepHours {
        file: &'static str,
        line: usize,
        value: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// What got loaded, for the status line.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub occurrence_rows: usize,
    pub day_stat_rows: usize,
    pub load_time_ms: u64,
}

#[derive(Debug)]
pub struct LoadedData {
    pub store: RecordStore,
    pub report: LoadReport,
}

/// Read and parse both tables, then build the record store.
pub fn load_dir(dir: &Path) -> Result<LoadedData, LoadError> {
    let start = Instant::now();
    let occurrences_path = dir.join(OCCURRENCES_FILE);
    let day_stats_path = dir.join(DAY_STATS_FILE);

    // The two reads are independent; join both before building anything.
    let (occurrences, day_stats) = std::thread::scope(|scope| {
        let occurrences = scope.spawn(|| {
            let text = read_file(&occurrences_path)?;
            parse_occurrences(&text)
        });
        let day_stats = scope.spawn(|| {
            let text = read_file(&day_stats_path)?;
            parse_day_stats(&text)
        });
        (
            occurrences.join().expect("occurrence loader panicked"),
            day_stats.join().expect("day-stat loader panicked"),
        )
    });
    let occurrences = occurrences?;
    let day_stats = day_stats?;

    let report = LoadReport {
        occurrence_rows: occurrences.len(),
        day_stat_rows: day_stats.len(),
        load_time_ms: start.elapsed().as_millis() as u64,
    };
    tracing::info!(
        occurrences = report.occurrence_rows,
        day_stats = report.day_stat_rows,
        ms = report.load_time_ms,
        "loaded data from {}",
        dir.display()
    );

    let store = RecordStore::load(occurrences, day_stats)?;
    Ok(LoadedData { store, report })
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Data lines with their 1-based line numbers: blanks and the header skipped.
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .filter(|(_, line)| {
            !line
                .split(',')
                .next()
                .is_some_and(|first| first.trim().eq_ignore_ascii_case("date"))
        })
}

fn parse_occurrences(text: &str) -> Result<Vec<Occurrence>, LoadError> {
    const FILE: &str = OCCURRENCES_FILE;
    let mut rows = Vec::new();

    for (line_no, line) in data_lines(text) {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 || fields[1].is_empty() {
            return Err(LoadError::MissingField {
                file: FILE,
                line: line_no,
                expected: 2,
            });
        }

        let date = parse_date(FILE, line_no, fields[0])?;
        let tag = match fields.get(2).copied().filter(|f| !f.is_empty()) {
            Some(raw) => Some(parse_mind_state(FILE, line_no, raw)?),
            None => None,
        };

        rows.push(Occurrence {
            date,
            word: fields[1].to_string(),
            tag,
        });
    }

    Ok(rows)
}

fn parse_day_stats(text: &str) -> Result<Vec<DayStat>, LoadError> {
    const FILE: &str = DAY_STATS_FILE;
    let mut rows = Vec::new();

    for (line_no, line) in data_lines(text) {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(LoadError::MissingField {
                file: FILE,
                line: line_no,
                expected: 3,
            });
        }

        let date = parse_date(FILE, line_no, fields[0])?;
        let mind_state = parse_mind_state(FILE, line_no, fields[1])?;
        let sleep_hours: f32 = fields[2].parse().map_err(|_| LoadError::InvalidSleepHours {
            file: FILE,
            line: line_no,
            value: fields[2].to_string(),
        })?;
        if !sleep_hours.is_finite() || sleep_hours < 0.0 {
            return Err(LoadError::InvalidSleepHours {
                file: FILE,
                line: line_no,
                value: fields[2].to_string(),
            });
        }

        rows.push(DayStat {
            date,
            mind_state,
            sleep_hours,
        });
    }

    Ok(rows)
}

fn parse_date(file: &'static str, line: usize, raw: &str) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| LoadError::InvalidDate {
        file,
        line,
        value: raw.to_string(),
    })
}

fn parse_mind_state(file: &'static str, line: usize, raw: &str) -> Result<MindState, LoadError> {
    raw.parse::<i8>()
        .ok()
        .and_then(MindState::from_score)
        .ok_or_else(|| LoadError::InvalidMindState {
            file,
            line,
            value: raw.to_string(),
        })
}
