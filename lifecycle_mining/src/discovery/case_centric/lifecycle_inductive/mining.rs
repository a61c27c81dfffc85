use itertools::Itertools;
use tracing::debug;

use crate::core::event_data::lifecycle::{Activity, LifecycleLog};
use crate::core::process_models::case_centric::process_tree::CutType;
use crate::core::process_models::case_centric::{DirectlyFollowsGraph, ProcessTree};

use super::config::LifecycleMinerConfig;
use super::cuts::{
    detect_exclusive, detect_interleaving, detect_loop, detect_parallel, detect_sequence, Cut,
    CutContext,
};
use super::partition::Block;

type Detector = fn(&CutContext<'_>) -> Option<Cut>;

///
/// Discover a [`ProcessTree`] from a [`LifecycleLog`]
///
/// The log is repaired first. Its directly-follows graph is the root graph
/// used by the interleaving boundary check at every level of the recursion.
///
pub fn discover_process_tree(log: &LifecycleLog, config: &LifecycleMinerConfig) -> ProcessTree {
    let log = log.repaired();
    let root_dfg = DirectlyFollowsGraph::create_from_log(&log);
    mine(&log, &root_dfg, config)
}

///
/// Minimal leaf for a log that needs no further decomposition
///
/// A log is minimal if it uses at most one activity, every trace has the
/// same alphabet and every trace is empty, a single start event or one
/// start/complete pair of the same activity. An empty log yields τ.
///
pub fn base_case(log: &LifecycleLog) -> Option<ProcessTree> {
    let alphabet = log.activities();
    if alphabet.len() > 1 {
        return None;
    }
    let minimal = log.traces.iter().all(|t| {
        let shape = match t.events.as_slice() {
            [] => true,
            [e] => e.is_start(),
            [s, c] => s.is_start() && c.is_complete() && s.label == c.label,
            _ => false,
        };
        shape && t.activities() == alphabet
    });
    if !minimal {
        return None;
    }
    Some(
        alphabet
            .into_iter()
            .next()
            .map_or_else(ProcessTree::silent, ProcessTree::leaf),
    )
}

/// Mine a repaired (sub-)log
pub(crate) fn mine(
    log: &LifecycleLog,
    root_dfg: &DirectlyFollowsGraph,
    config: &LifecycleMinerConfig,
) -> ProcessTree {
    if let Some(leaf) = base_case(log) {
        return leaf;
    }
    let ctx = CutContext::new(log, root_dfg);
    match find_cut(&ctx, config) {
        Some(cut) => {
            debug!(
                "Found {:?} cut with blocks {}",
                cut.cut_type,
                render_blocks(&cut.blocks)
            );
            let children = cut
                .sub_logs
                .iter()
                .map(|sub_log| mine(sub_log, root_dfg, config))
                .collect();
            ProcessTree::cut(cut.cut_type, children)
        }
        None => fallback(log, root_dfg, config),
    }
}

///
/// First cut (in detection order) whose sub-logs all have a smaller rank
/// than the log itself
///
/// Sub-logs are repaired before they are compared.
///
fn find_cut(ctx: &CutContext<'_>, config: &LifecycleMinerConfig) -> Option<Cut> {
    let detectors: [(bool, Detector); 5] = [
        (true, detect_sequence),
        (config.detect_interleaving, detect_interleaving),
        (true, detect_parallel),
        (true, detect_exclusive),
        (true, detect_loop),
    ];
    let parent_rank = rank(ctx.log);
    for (_, detect) in detectors.iter().filter(|(enabled, _)| *enabled) {
        let Some(cut) = detect(ctx) else {
            continue;
        };
        let sub_logs: Vec<LifecycleLog> = cut.sub_logs.iter().map(LifecycleLog::repaired).collect();
        if sub_logs.iter().all(|s| rank(s) < parent_rank) {
            return Some(Cut { sub_logs, ..cut });
        }
        debug!(
            "Skipping {:?} cut with blocks {}: a sub-log does not shrink",
            cut.cut_type,
            render_blocks(&cut.blocks)
        );
    }
    None
}

/// Two per visible activity, one for τ
fn rank(log: &LifecycleLog) -> usize {
    let alphabet = log.activities();
    let visible = alphabet.iter().filter(|a| !a.is_silent()).count();
    2 * visible + usize::from(alphabet.len() > visible)
}

///
/// Decomposition if no cut applies
///
/// A log with silent or empty traces becomes an exclusive choice between τ
/// and the rest of the log. Any other log becomes the flower model
/// `◯(×(a, b, ...), τ)`.
///
fn fallback(
    log: &LifecycleLog,
    root_dfg: &DirectlyFollowsGraph,
    config: &LifecycleMinerConfig,
) -> ProcessTree {
    if log.traces.iter().any(|t| t.is_silent() || t.is_empty()) {
        debug!("No cut found, skipping silent traces");
        let rest = mine(&log.without_silent_traces(), root_dfg, config);
        return ProcessTree::cut(CutType::Exclusive, vec![ProcessTree::silent(), rest]);
    }
    debug!("No cut found, falling back to flower model");
    ProcessTree::cut(CutType::Loop, vec![flower_body(log), ProcessTree::silent()])
}

fn flower_body(log: &LifecycleLog) -> ProcessTree {
    let mut leaves: Vec<ProcessTree> = log
        .activities()
        .into_iter()
        .filter(|a| !a.is_silent())
        .map(ProcessTree::leaf)
        .collect();
    match leaves.len() {
        0 => ProcessTree::silent(),
        1 => leaves.remove(0),
        _ => ProcessTree::cut(CutType::Exclusive, leaves),
    }
}

fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| format!("{{{}}}", b.iter().map(Activity::to_string).join(", ")))
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::lifecycle::Trace;
    use crate::utils::test_utils::{act, events, pair_log, pairs};
    use std::collections::BTreeSet;

    fn mine_default(log: &LifecycleLog) -> ProcessTree {
        discover_process_tree(log, &LifecycleMinerConfig::default())
    }

    fn expression(log: &LifecycleLog) -> String {
        mine_default(log).to_string()
    }

    fn visible(log: &LifecycleLog) -> BTreeSet<Activity> {
        log.activities()
            .into_iter()
            .filter(|a| !a.is_silent())
            .collect()
    }

    #[test]
    fn minimal_logs() {
        assert_eq!(base_case(&LifecycleLog::default()), Some(ProcessTree::silent()));
        assert_eq!(
            base_case(&pair_log(&["a", "a"])),
            Some(ProcessTree::leaf(act("a")))
        );
        assert_eq!(
            base_case(&LifecycleLog::new(vec![Trace::silent()])),
            Some(ProcessTree::silent())
        );
        assert!(base_case(&pair_log(&["a a"])).is_none());
        assert!(base_case(&pair_log(&["a", "b"])).is_none());
        assert!(base_case(&LifecycleLog::new(vec![Trace::default(), events("a+ a-")])).is_none());
    }

    #[test]
    fn rank_counts_silent_once() {
        assert_eq!(rank(&pair_log(&["a b"])), 4);
        let log = LifecycleLog::new(vec![Trace::silent(), events("a+ a-")]);
        assert_eq!(rank(&log), 3);
        assert_eq!(rank(&LifecycleLog::default()), 0);
    }

    #[test]
    fn cyclic_log_becomes_flower() {
        let log = pair_log(&["a b c", "c a b"]);
        let tree = mine_default(&log);
        assert_eq!(tree.to_string(), "◯(×(a,b,c),τ)");
        assert_eq!(tree.cut_type(), Some(CutType::Loop));
        assert!(tree.children()[1].is_silent_leaf());
    }

    #[test]
    fn unrelated_single_activities_become_flower() {
        let log = pair_log(&["a", "b"]);
        assert_eq!(expression(&log), "◯(×(a,b),τ)");
    }

    #[test]
    fn swapped_pairs_interleave() {
        let log = pair_log(&["a b", "b a"]);
        assert_eq!(expression(&log), "<->(a,b)");
    }

    #[test]
    fn overlapping_pairs_are_parallel() {
        let log = LifecycleLog::new(vec![events("a+ b+ a- b-"), events("b+ a+ b- a-")]);
        assert_eq!(expression(&log), "+(a,b)");
    }

    #[test]
    fn repeated_block_is_loop() {
        let log = pair_log(&["a b c d e a b c d", "a b c d"]);
        let tree = mine_default(&log);
        assert_eq!(tree.to_string(), "◯(→(a,b,c,d),e)");
        assert!(!tree.children()[0].is_leaf());
        assert!(!tree.children()[1].is_silent_leaf());
    }

    #[test]
    fn plain_repetition_is_loop() {
        for log in [
            pair_log(&["a b c d a b c d"]),
            pair_log(&["a b c d a b c d", "a b c d"]),
        ] {
            let tree = mine_default(&log);
            assert_eq!(tree.cut_type(), Some(CutType::Loop));
            assert!(!tree.children()[1].is_silent_leaf());
            assert_eq!(tree.to_string(), "◯(→(×(τ,d),×(τ,a)),→(b,c))");
        }
    }

    #[test]
    fn cut_without_shrinking_sub_log_is_skipped() {
        // the sequence cut would hand {a, τ} down unchanged
        let log = LifecycleLog::new(vec![pairs("a τ"), Trace::silent()]);
        let root = DirectlyFollowsGraph::create_from_log(&log);
        let ctx = CutContext::new(&log, &root);
        let sequence = detect_sequence(&ctx).unwrap();
        assert!(sequence
            .sub_logs
            .iter()
            .any(|s| rank(&s.repaired()) >= rank(&log)));
        assert!(find_cut(&ctx, &LifecycleMinerConfig::default()).is_none());
        assert_eq!(expression(&log), "×(τ,→(a,τ))");
    }

    #[test]
    fn structured_cuts_shrink_the_alphabet() {
        let config = LifecycleMinerConfig::default();
        for log in [
            pair_log(&["a b c d a b c d", "a b c d"]),
            pair_log(&["a b c d e a b c d", "a b c d"]),
            pair_log(&["x a b y", "x b a y"]),
            pair_log(&["a b c", "a c"]),
            pair_log(&["a b", "c"]),
            LifecycleLog::new(vec![events("a+ b+ a- b-"), events("b+ a+ b- a-")]),
        ] {
            let log = log.repaired();
            let root = DirectlyFollowsGraph::create_from_log(&log);
            let ctx = CutContext::new(&log, &root);
            let cut = find_cut(&ctx, &config).unwrap();
            for sub_log in &cut.sub_logs {
                assert!(visible(sub_log).len() < visible(&log).len(), "{:?}", cut.cut_type);
            }
        }
    }

    #[test]
    fn interleaving_inside_sequence() {
        let log = pair_log(&["x a b y", "x b a y"]);
        assert_eq!(expression(&log), "→(x,<->(a,b),y)");
    }

    #[test]
    fn interleaving_can_be_disabled() {
        let log = pair_log(&["a b", "b a"]);
        let config = LifecycleMinerConfig {
            detect_interleaving: false,
            ..Default::default()
        };
        assert_eq!(discover_process_tree(&log, &config).to_string(), "◯(×(a,b),τ)");
    }

    #[test]
    fn empty_trace_is_optional_behavior() {
        let log = LifecycleLog::new(vec![Trace::default(), pairs("a b")]);
        assert_eq!(expression(&log), "×(τ,→(a,b))");
    }

    #[test]
    fn skippable_activity() {
        assert_eq!(expression(&pair_log(&["a b c", "a c"])), "→(a,×(τ,b),c)");
        assert_eq!(expression(&pair_log(&["a b", "c"])), "×(→(a,b),c)");
    }

    #[test]
    fn malformed_traces_are_repaired() {
        let log = LifecycleLog::new(vec![events("a- b+")]);
        assert_eq!(expression(&log), "→(a,b)");
    }

    #[test]
    fn depth_is_bounded_by_alphabet() {
        for log in [
            pair_log(&["a b c", "c a b"]),
            pair_log(&["a b c d e a b c d", "a b c d"]),
            pair_log(&["a b c d a b c d"]),
            pair_log(&["x a b y", "x b a y"]),
            pair_log(&["a b c", "a c"]),
        ] {
            let tree = mine_default(&log);
            assert!(tree.depth() <= log.activities().len(), "{tree}");
        }
    }

    #[test]
    fn every_activity_is_kept() {
        for log in [
            LifecycleLog::new(vec![
                events("a+ b+ a- c+ b- c-"),
                events("c+ c- a+ a- b+ b-"),
                events("b-"),
            ]),
            LifecycleLog::new(vec![
                events("a+ b+ c+ a- d+ b- c- d-"),
                events("d+ d- a+ a-"),
                Trace::default(),
            ]),
            pair_log(&["a b a c a", "b b c", "c", "a d e d a"]),
            pair_log(&["a b c d", "b a d c", "a b d c", "e"]),
        ] {
            let tree = mine_default(&log);
            assert_eq!(tree.activities(), visible(&log.repaired()), "{tree}");
        }
    }
}
