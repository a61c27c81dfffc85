//! Splitting a log into sub-logs along the blocks of a cut

use crate::core::event_data::lifecycle::{Activity, LifecycleLog, Trace};

use super::partition::{block_index, Block};

///
/// Project every trace onto every block
///
/// Sub-log `i` holds, per trace, the events of block `i` in their original
/// order. A trace without events of a block contributes the silent pair
/// instead.
///
pub fn project(log: &LifecycleLog, blocks: &[Block]) -> Vec<LifecycleLog> {
    let mut sub_logs: Vec<LifecycleLog> = vec![LifecycleLog::default(); blocks.len()];
    for trace in &log.traces {
        let mut grouped: Vec<Vec<Activity>> = vec![Vec::new(); blocks.len()];
        for event in &trace.events {
            if let Some(i) = block_index(blocks, event) {
                grouped[i].push(event.clone());
            }
        }
        for (sub_log, events) in sub_logs.iter_mut().zip(grouped) {
            let sub_trace = if events.is_empty() {
                Trace::silent()
            } else {
                Trace::new(events)
            };
            sub_log.traces.push(Trace {
                case_id: trace.case_id,
                ..sub_trace
            });
        }
    }
    sub_logs
}

///
/// Per trace, the indices of the blocks it has no events of
///
pub fn absent_blocks(log: &LifecycleLog, blocks: &[Block]) -> Vec<Vec<usize>> {
    log.traces
        .iter()
        .map(|t| {
            let mut present = vec![false; blocks.len()];
            for event in &t.events {
                if let Some(i) = block_index(blocks, event) {
                    present[i] = true;
                }
            }
            (0..blocks.len()).filter(|&i| !present[i]).collect()
        })
        .collect()
}

///
/// Remove silent traces from every sub-log
///
/// At most `limit` silent traces are removed per sub-log; `None` removes all.
///
pub fn strip_silent_traces(sub_logs: &mut [LifecycleLog], limit: Option<usize>) {
    for sub_log in sub_logs {
        let mut removed = 0;
        sub_log.traces.retain(|t| {
            if t.is_silent() && limit.map_or(true, |l| removed < l) {
                removed += 1;
                false
            } else {
                true
            }
        });
    }
}

///
/// Split every trace into runs of events of the same block
///
/// A run ends as soon as an event of another block occurs; it becomes a
/// trace of the sub-log of the block it belongs to.
///
pub fn loop_runs(log: &LifecycleLog, blocks: &[Block]) -> Vec<LifecycleLog> {
    let mut sub_logs: Vec<LifecycleLog> = vec![LifecycleLog::default(); blocks.len()];
    for trace in &log.traces {
        let mut current: Vec<Activity> = Vec::new();
        let mut current_block: Option<usize> = None;
        for event in &trace.events {
            let block = block_index(blocks, event);
            if let Some(previous) = current_block {
                if block != Some(previous) {
                    sub_logs[previous]
                        .traces
                        .push(Trace::new(std::mem::take(&mut current)));
                }
            }
            current.push(event.clone());
            current_block = block;
        }
        if let Some(last) = current_block {
            sub_logs[last].traces.push(Trace::new(current));
        }
    }
    sub_logs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{act, events, pair_log, pairs};

    fn blocks(spec: &[&str]) -> Vec<Block> {
        spec.iter()
            .map(|b| b.split_whitespace().map(act).collect())
            .collect()
    }

    #[test]
    fn projection_inserts_silent_pairs() {
        let log = pair_log(&["a b c", "a c"]);
        let sub_logs = project(&log, &blocks(&["a", "b", "c"]));
        assert_eq!(sub_logs.len(), 3);
        assert_eq!(sub_logs[0].traces, vec![pairs("a"), pairs("a")]);
        assert_eq!(sub_logs[1].traces, vec![pairs("b"), Trace::silent()]);
        assert_eq!(sub_logs[2].traces, vec![pairs("c"), pairs("c")]);
    }

    #[test]
    fn projection_keeps_interleaved_events() {
        let log = LifecycleLog::new(vec![events("a+ b+ a- c+ c- b-")]);
        let sub_logs = project(&log, &blocks(&["a c", "b"]));
        assert_eq!(sub_logs[0].traces, vec![events("a+ a- c+ c-")]);
        assert_eq!(sub_logs[1].traces, vec![pairs("b")]);
    }

    #[test]
    fn absent_block_indices() {
        let log = pair_log(&["a b c d", "a d", "a c d"]);
        let absent = absent_blocks(&log, &blocks(&["a", "b", "c", "d"]));
        assert_eq!(absent, vec![vec![], vec![1, 2], vec![1]]);
    }

    #[test]
    fn silent_traces_are_stripped_up_to_limit() {
        let mut sub_logs = vec![LifecycleLog::new(vec![
            Trace::silent(),
            pairs("a"),
            Trace::silent(),
            Trace::silent(),
        ])];
        strip_silent_traces(&mut sub_logs, Some(2));
        assert_eq!(sub_logs[0].traces, vec![pairs("a"), Trace::silent()]);
        strip_silent_traces(&mut sub_logs, None);
        assert_eq!(sub_logs[0].traces, vec![pairs("a")]);
    }

    #[test]
    fn runs_go_to_their_own_block() {
        let log = pair_log(&["a b c d e a b c d", "a b c d"]);
        let sub_logs = loop_runs(&log, &blocks(&["a b c d", "e"]));
        assert_eq!(
            sub_logs[0].traces,
            vec![pairs("a b c d"), pairs("a b c d"), pairs("a b c d")]
        );
        assert_eq!(sub_logs[1].traces, vec![pairs("e")]);
    }
}
