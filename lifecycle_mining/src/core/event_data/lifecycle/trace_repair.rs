//! Repair of inconsistent lifecycle traces
//!
//! Incomplete lifecycle information is handled as atomic (zero-duration)
//! activity instances: a complete event without an open start gets a start
//! event directly in front of it, and a start event that is never completed
//! gets a complete event directly after it.
use super::activity::{Activity, Lifecycle};
use super::lifecycle_log_struct::{LifecycleLog, Trace};

///
/// Repair a single trace so that all lifecycle events are balanced
///
/// Open starts are tracked on a stack; a complete event closes the most
/// recently opened start with the same label. Repair never fails and
/// preserves the relative order of all original events.
///
/// Events carrying the [`Lifecycle::Default`] marker are expanded into an
/// atomic start/complete pair.
///
pub fn repair_trace(trace: &Trace) -> Trace {
    let mut repaired: Vec<Activity> = Vec::with_capacity(trace.events.len());
    // (label, position in `repaired`) of starts that are not completed yet
    let mut open: Vec<(&str, usize)> = Vec::new();

    for event in &trace.events {
        match event.lifecycle {
            Lifecycle::Start => {
                open.push((event.label.as_str(), repaired.len()));
                repaired.push(event.clone());
            }
            Lifecycle::Complete => {
                match open.iter().rposition(|(label, _)| *label == event.label) {
                    Some(pos) => {
                        open.remove(pos);
                    }
                    None => repaired.push(event.as_start()),
                }
                repaired.push(event.clone());
            }
            Lifecycle::Default => {
                repaired.push(event.as_start());
                repaired.push(event.as_complete());
            }
        }
    }

    // Back to front, so that earlier positions stay valid
    for (_, pos) in open.into_iter().rev() {
        let complete = repaired[pos].as_complete();
        repaired.insert(pos + 1, complete);
    }

    Trace {
        case_id: trace.case_id,
        events: repaired,
    }
}

/// Repair every trace of a log (see [`repair_trace`])
pub fn repair_log(log: &LifecycleLog) -> LifecycleLog {
    LifecycleLog {
        traces: log.traces.iter().map(repair_trace).collect(),
    }
}
