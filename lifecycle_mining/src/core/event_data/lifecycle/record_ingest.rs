//! Ingestion of newline-delimited process execution records
//!
//! Each line is a JSON object describing one lifecycle event of one process
//! instance, e.g.:
//!
//! ```json
//! {"instance_name":"Coopis 2010","instance":42,"timestamp":"2024-05-02T10:15:00+02:00","activity":"a1","event":"calling","label":"Check order"}
//! ```
use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;

use super::activity::{Activity, Lifecycle};
use super::io::LifecycleLogIOError;
use super::lifecycle_log_struct::{LifecycleLog, Trace};

/// Event kind marking the start of an activity
pub const EVENT_CALLING: &str = "calling";
/// Event kind marking the completion of an activity
pub const EVENT_DONE: &str = "done";

///
/// A single execution record of a process instance
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Name of the process (model) the instance belongs to
    pub instance_name: String,
    /// Numeric case identifier
    pub instance: u64,
    /// Time at which the event was recorded
    pub timestamp: DateTime<FixedOffset>,
    /// Activity identifier
    pub activity: String,
    /// Event kind (`calling` or `done`; other kinds are ignored)
    pub event: String,
    /// Display label of the activity
    #[serde(default)]
    pub label: Option<String>,
}

impl LogRecord {
    /// Lifecycle marker of this record, if the event kind is a lifecycle event
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        match self.event.as_str() {
            EVENT_CALLING => Some(Lifecycle::Start),
            EVENT_DONE => Some(Lifecycle::Complete),
            _ => None,
        }
    }

    /// The lifecycle [`Activity`] described by this record
    pub fn to_activity(&self) -> Option<Activity> {
        let lifecycle = self.lifecycle()?;
        Some(Activity {
            label: self.activity.clone(),
            lifecycle,
            name: self.label.clone(),
        })
    }
}

///
/// Options for importing records into a [`LifecycleLog`]
///
#[derive(Debug, Clone, Default)]
pub struct RecordImportOptions {
    /// Only use records of this process name (all records if `None`)
    pub process_name: Option<String>,
}

///
/// Build a [`LifecycleLog`] from execution records
///
/// Records are grouped by case id (traces are ordered by ascending case id)
/// and ordered by timestamp within a case. Records with equal timestamps keep
/// their input order.
///
pub fn log_from_records<I: IntoIterator<Item = LogRecord>>(
    records: I,
    options: &RecordImportOptions,
) -> LifecycleLog {
    let mut cases: BTreeMap<u64, Vec<LogRecord>> = BTreeMap::new();
    for record in records.into_iter().filter(|r| {
        options
            .process_name
            .as_ref()
            .map_or(true, |name| &r.instance_name == name)
    }) {
        cases.entry(record.instance).or_default().push(record);
    }

    let traces = cases
        .into_iter()
        .map(|(case_id, records)| Trace {
            case_id: Some(case_id),
            events: records
                .into_iter()
                .sorted_by_key(|r| r.timestamp)
                .filter_map(|r| r.to_activity())
                .collect(),
        })
        .collect();
    LifecycleLog { traces }
}

///
/// Import newline-delimited JSON records from a reader
///
/// Blank lines are skipped. The first malformed line aborts the import with
/// [`LifecycleLogIOError::Record`].
///
pub fn import_records_reader<R: BufRead>(
    reader: R,
    options: &RecordImportOptions,
) -> Result<LifecycleLog, LifecycleLogIOError> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: LogRecord = serde_json::from_str(&line).map_err(|source| {
            LifecycleLogIOError::Record {
                line: i + 1,
                source,
            }
        })?;
        records.push(record);
    }
    Ok(log_from_records(records, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"
{"instance_name":"Coopis 2010","instance":7,"timestamp":"2024-05-02T10:15:03+02:00","activity":"a2","event":"done","label":"Ship"}
{"instance_name":"Coopis 2010","instance":3,"timestamp":"2024-05-02T10:00:00+02:00","activity":"a1","event":"calling","label":"Check"}
{"instance_name":"Coopis 2010","instance":7,"timestamp":"2024-05-02T10:15:01+02:00","activity":"a2","event":"calling","label":"Ship"}
{"instance_name":"Other","instance":3,"timestamp":"2024-05-02T09:00:00+02:00","activity":"x","event":"calling","label":"X"}

{"instance_name":"Coopis 2010","instance":3,"timestamp":"2024-05-02T10:00:02+02:00","activity":"a1","event":"done","label":"Check"}
{"instance_name":"Coopis 2010","instance":3,"timestamp":"2024-05-02T10:00:01+02:00","activity":"a1","event":"dataelements/change","label":"Check"}
"#;

    #[test]
    fn groups_and_orders_records() {
        let log = import_records_reader(
            RECORDS.as_bytes(),
            &RecordImportOptions {
                process_name: Some("Coopis 2010".into()),
            },
        )
        .unwrap();
        assert_eq!(log.traces.len(), 2);
        assert_eq!(log.traces[0].case_id, Some(3));
        assert_eq!(
            log.traces[0].events,
            vec![Activity::start("a1"), Activity::complete("a1")]
        );
        assert_eq!(log.traces[0].events[0].display_name(), "Check");
        assert_eq!(log.traces[1].case_id, Some(7));
        assert_eq!(
            log.traces[1].events,
            vec![Activity::start("a2"), Activity::complete("a2")]
        );
    }

    #[test]
    fn all_processes_without_filter() {
        let log = import_records_reader(RECORDS.as_bytes(), &RecordImportOptions::default())
            .unwrap();
        // case 3 holds records of both processes
        assert_eq!(log.traces.len(), 2);
        assert_eq!(log.traces[0].events.len(), 3);
        assert_eq!(log.traces[0].events[0], Activity::start("x"));
    }

    #[test]
    fn malformed_line_reports_position() {
        let input = "{\"instance_name\":\"p\",\"instance\":1,\"timestamp\":\"2024-05-02T10:00:00Z\",\"activity\":\"a\",\"event\":\"done\"}\nnot json\n";
        match import_records_reader(input.as_bytes(), &RecordImportOptions::default()) {
            Err(LifecycleLogIOError::Record { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
