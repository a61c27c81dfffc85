//! Cut detection on a (sub-)log
//!
//! Every detector starts from the finest partition of the current alphabet,
//! merges blocks according to its join rule and rejects the cut (`None`) if
//! a single block remains.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use tracing::debug;

use crate::core::event_data::lifecycle::{Activity, LifecycleLog, Trace};
use crate::core::process_models::case_centric::dfg::Reachability;
use crate::core::process_models::case_centric::process_tree::CutType;
use crate::core::process_models::case_centric::{ConcurrencyGraph, DirectlyFollowsGraph};

use super::partition::{Block, Partition};
use super::sublogs::{absent_blocks, loop_runs, project, strip_silent_traces};

/// A detected cut: its operator, the partition blocks and one sub-log per child
#[derive(Debug, Clone)]
pub struct Cut {
    /// Operator of the cut
    pub cut_type: CutType,
    /// Partition of the alphabet (in child order)
    pub blocks: Vec<Block>,
    /// Sub-logs to recurse into (one per child)
    pub sub_logs: Vec<LifecycleLog>,
}

///
/// Relations of the sub-log a cut is searched in
///
/// `root_dfg` is the directly-follows graph of the top-level log, shared by
/// the whole recursion.
///
#[derive(Debug)]
pub struct CutContext<'a> {
    /// Repaired sub-log
    pub log: &'a LifecycleLog,
    /// Collapsed alphabet of the sub-log
    pub alphabet: BTreeSet<Activity>,
    /// Directly-follows graph of the sub-log
    pub dfg: DirectlyFollowsGraph,
    /// Concurrency graph of the sub-log
    pub ccg: ConcurrencyGraph,
    /// Directly-follows graph of the top-level log
    pub root_dfg: &'a DirectlyFollowsGraph,
    reachability: Reachability,
}

impl<'a> CutContext<'a> {
    /// Derive the relations of a repaired sub-log
    pub fn new(log: &'a LifecycleLog, root_dfg: &'a DirectlyFollowsGraph) -> Self {
        let dfg = DirectlyFollowsGraph::create_from_log(log);
        let reachability = dfg.reachability();
        Self {
            log,
            alphabet: log.activities(),
            ccg: ConcurrencyGraph::create_from_log(log),
            dfg,
            root_dfg,
            reachability,
        }
    }

    fn reaches(&self, a: &Activity, b: &Activity) -> bool {
        self.reachability.reaches(a, b)
    }

    fn finest_partition(&self) -> Partition {
        Partition::finest(&self.alphabet)
    }

    /// Blocks `P` before `Q` if every element of `P` reaches every element of `Q`
    fn order_by_reachability(&self, blocks: &mut [Block]) {
        let precedes = |p: &Block, q: &Block| p.iter().all(|a| q.iter().all(|b| self.reaches(a, b)));
        let successors: Vec<usize> = blocks
            .iter()
            .map(|p| {
                blocks
                    .iter()
                    .filter(|q| *q != p && precedes(p, *q))
                    .count()
            })
            .collect();
        let ordered: Vec<Block> = blocks
            .iter()
            .cloned()
            .zip(successors)
            .sorted_by_key(|(_, n)| Reverse(*n))
            .map(|(b, _)| b)
            .collect();
        blocks.clone_from_slice(&ordered);
    }

    fn parallel_partition(&self) -> Partition {
        let mut p = self.finest_partition();
        p.merge_where(|a, b| !self.ccg.is_concurrent(a, b));
        p
    }
}

///
/// Sequence cut
///
/// Activities that reach each other, or are unrelated, end up in one block.
/// Blocks are ordered by reachability. Runs of consecutive blocks that a
/// trace skips entirely are merged, so a skipped stretch becomes one silent
/// step of a single child.
///
pub fn detect_sequence(ctx: &CutContext<'_>) -> Option<Cut> {
    if ctx.dfg.is_empty() {
        return None;
    }
    let mut p = ctx.finest_partition();
    p.merge_where(|a, b| {
        let (ab, ba) = (ctx.reaches(a, b), ctx.reaches(b, a));
        ab == ba
    });
    if p.len() < 2 {
        return None;
    }
    let mut blocks = p.blocks();
    ctx.order_by_reachability(&mut blocks);

    for absent in absent_blocks(ctx.log, &blocks) {
        for (i, j) in absent.iter().tuple_windows() {
            if j - i == 1 {
                let (a, b) = (blocks[*i].first(), blocks[*j].first());
                if let (Some(a), Some(b)) = (a, b) {
                    p.merge(a, b);
                }
            }
        }
    }
    if p.len() < 2 {
        debug!("Sequence cut collapsed into a single block");
        return None;
    }
    let mut blocks = p.blocks();
    ctx.order_by_reachability(&mut blocks);
    let sub_logs = project(ctx.log, &blocks);
    Some(Cut {
        cut_type: CutType::Sequence,
        blocks,
        sub_logs,
    })
}

///
/// Exclusive-choice cut
///
/// Activities connected by reachability (in any direction) end up in one
/// block. Silent traces are dropped from the sub-logs.
///
/// A log without any directly-follows relation (e.g. `[a], [b]`) has no
/// exclusive cut. Such a log ends up in the flower model `◯(×(a, b), τ)`.
///
pub fn detect_exclusive(ctx: &CutContext<'_>) -> Option<Cut> {
    if ctx.dfg.is_empty() {
        return None;
    }
    let mut p = ctx.finest_partition();
    p.merge_where(|a, b| ctx.reaches(a, b) || ctx.reaches(b, a));
    if p.len() < 2 {
        return None;
    }
    let blocks = p.blocks();
    let mut sub_logs = project(ctx.log, &blocks);
    strip_silent_traces(&mut sub_logs, None);
    Some(Cut {
        cut_type: CutType::Exclusive,
        blocks,
        sub_logs,
    })
}

///
/// Parallel cut
///
/// Blocks are the connected components of the complement of the concurrency
/// graph. Up to one silent trace per block is dropped from each sub-log.
///
pub fn detect_parallel(ctx: &CutContext<'_>) -> Option<Cut> {
    let p = ctx.parallel_partition();
    if p.len() < 2 {
        return None;
    }
    let blocks = p.blocks();
    let mut sub_logs = project(ctx.log, &blocks);
    strip_silent_traces(&mut sub_logs, Some(blocks.len()));
    Some(Cut {
        cut_type: CutType::Parallel,
        blocks,
        sub_logs,
    })
}

///
/// Interleaving cut
///
/// Activities end up in one block unless they directly follow each other in
/// both directions. The blocks must have consistent boundaries in the
/// top-level log (see [`boundaries_consistent`]). If all blocks overlap
/// pairwise, or the concurrency graph alone separates the alphabet, a
/// parallel cut is reported instead. An interleaving cut has one child per
/// activity.
///
pub fn detect_interleaving(ctx: &CutContext<'_>) -> Option<Cut> {
    let mut p = ctx.finest_partition();
    p.merge_where(|a, b| !(ctx.dfg.directly_reaches(a, b) && ctx.dfg.directly_reaches(b, a)));
    if p.len() < 2 {
        return None;
    }
    let blocks = p.blocks();
    if !boundaries_consistent(ctx, &blocks) {
        debug!("Interleaving candidate {:?} has inconsistent boundaries", blocks);
        return None;
    }

    let fully_concurrent = blocks
        .iter()
        .tuple_combinations()
        .all(|(pa, pb)| ctx.ccg.are_concurrent(pa, pb));
    if fully_concurrent {
        let sub_logs = project(ctx.log, &blocks);
        return Some(Cut {
            cut_type: CutType::Parallel,
            blocks,
            sub_logs,
        });
    }
    let np = ctx.parallel_partition();
    if np.len() > 1 {
        let blocks = np.blocks();
        let sub_logs = project(ctx.log, &blocks);
        return Some(Cut {
            cut_type: CutType::Parallel,
            blocks,
            sub_logs,
        });
    }

    let blocks: Vec<Block> = ctx
        .alphabet
        .iter()
        .map(|a| Block::from([a.clone()]))
        .collect();
    let sub_logs = ctx
        .alphabet
        .iter()
        .map(|a| LifecycleLog::new(vec![Trace::new(vec![a.as_start(), a.as_complete()])]))
        .collect();
    Some(Cut {
        cut_type: CutType::Interleaving,
        blocks,
        sub_logs,
    })
}

///
/// Boundary check of an interleaving candidate against the top-level log
///
/// For a block `B`, its start activities are the activities of `B` entered
/// from outside of `B` (or starting a trace of the sub-log), its end
/// activities those left towards the outside of `B` (or ending a trace).
/// Every block needs start and end activities. Activities outside of the
/// current alphabet that lead into a block must lead into every start
/// activity of it, and must be the same for all blocks (ends likewise).
/// Finally, the start activities of every block either equal the start
/// activities common to all traces, or are disjoint from them (ends
/// likewise).
///
pub fn boundaries_consistent(ctx: &CutContext<'_>, blocks: &[Block]) -> bool {
    let root = ctx.root_dfg;
    let outside: BTreeSet<&Activity> = root
        .activities
        .iter()
        .filter(|a| !ctx.alphabet.contains(*a))
        .collect();
    let mut trace_starts: HashSet<Activity> = HashSet::new();
    let mut trace_ends: HashSet<Activity> = HashSet::new();
    for t in &ctx.log.traces {
        let (s, e) = t.start_end_activities();
        trace_starts.extend(s);
        trace_ends.extend(e);
    }
    let (common_starts, common_ends) = ctx.log.common_start_end_activities();

    let mut predecessors: Vec<BTreeSet<&Activity>> = Vec::new();
    let mut successors: Vec<BTreeSet<&Activity>> = Vec::new();
    for block in blocks {
        let starts: HashSet<Activity> = block
            .iter()
            .filter(|b| {
                trace_starts.contains(*b) || root.predecessors(b).any(|x| !block.contains(x))
            })
            .cloned()
            .collect();
        let ends: HashSet<Activity> = block
            .iter()
            .filter(|b| trace_ends.contains(*b) || root.successors(b).any(|x| !block.contains(x)))
            .cloned()
            .collect();
        if starts.is_empty() || ends.is_empty() {
            return false;
        }

        let preds: BTreeSet<&Activity> = outside
            .iter()
            .copied()
            .filter(|x| block.iter().any(|b| root.directly_reaches(x, b)))
            .collect();
        let succs: BTreeSet<&Activity> = outside
            .iter()
            .copied()
            .filter(|x| block.iter().any(|b| root.directly_reaches(b, x)))
            .collect();
        if !preds
            .iter()
            .all(|x| starts.iter().all(|s| root.directly_reaches(x, s)))
        {
            return false;
        }
        if !succs
            .iter()
            .all(|x| ends.iter().all(|e| root.directly_reaches(e, x)))
        {
            return false;
        }
        if !(starts == common_starts || starts.is_disjoint(&common_starts)) {
            return false;
        }
        if !(ends == common_ends || ends.is_disjoint(&common_ends)) {
            return false;
        }
        predecessors.push(preds);
        successors.push(succs);
    }
    predecessors.iter().all_equal() && successors.iter().all_equal()
}

///
/// Loop cut
///
/// The do-part starts with the start and end activities common to all
/// traces. An activity moves from the redo-part to the do-part if it is
/// reached from one of these activities that is not an end activity, or
/// reaches one that is not a start activity. The checks run against the
/// initial do-part only. If every activity would move, nothing moves and the
/// redo-part is made of all activities that neither start nor end a trace.
/// Sub-logs consist of the runs of do- and redo-activities.
///
pub fn detect_loop(ctx: &CutContext<'_>) -> Option<Cut> {
    let (starts, ends) = ctx.log.common_start_end_activities();
    let boundary: Block = starts.iter().chain(ends.iter()).cloned().collect();
    if boundary.is_empty() {
        return None;
    }
    let violates = |r: &Activity| {
        boundary.iter().any(|d| {
            (ctx.dfg.directly_reaches(d, r) && !ends.contains(d))
                || (ctx.dfg.directly_reaches(r, d) && !starts.contains(d))
        })
    };
    let outside = |part: &Block| -> Block {
        ctx.alphabet
            .iter()
            .filter(|a| !part.contains(*a))
            .cloned()
            .collect()
    };
    let moved: Block = outside(&boundary).into_iter().filter(violates).collect();
    let mut do_part: Block = boundary.union(&moved).cloned().collect();
    let mut redo_part = outside(&do_part);
    if redo_part.is_empty() && !moved.is_empty() {
        debug!("Loop candidate keeps only start and end activities in its do-part");
        do_part = boundary;
        redo_part = outside(&do_part);
    }
    if redo_part.is_empty() {
        return None;
    }
    let blocks = vec![do_part, redo_part];
    let sub_logs = loop_runs(ctx.log, &blocks);
    Some(Cut {
        cut_type: CutType::Loop,
        blocks,
        sub_logs,
    })
}
