use tracing::debug;

use crate::core::event_data::lifecycle::LifecycleLog;
use crate::core::process_models::case_centric::petri_net::{ArcType, TransitionID};
use crate::core::process_models::case_centric::process_tree::CutType;
use crate::core::process_models::case_centric::{LifecycleNet, ProcessTree};

use super::config::LifecycleMinerConfig;
use super::mining::discover_process_tree;

///
/// Synthesize a [`LifecycleNet`] from a [`ProcessTree`]
///
/// The net is built bottom-up: every node creates a skeleton with one
/// placeholder transition per child, and each placeholder is then replaced
/// by the net of its child (see [`LifecycleNet::splice`]). If `reduce` is
/// set, silent steps are reduced afterwards (see [`LifecycleNet::reduce`]).
///
pub fn synthesize_net(tree: &ProcessTree, reduce: bool) -> LifecycleNet {
    let mut net = build_net(tree);
    if reduce {
        let applied = net.reduce();
        debug!(
            "Applied {} reductions, net has {} places and {} transitions",
            applied,
            net.places.len(),
            net.transitions.len()
        );
    }
    net
}

///
/// Discover a [`LifecycleNet`] from a [`LifecycleLog`]
///
/// Mines the process tree and synthesizes its net, reduced if
/// `config.reduce_net` is set.
///
pub fn discover_lifecycle_net(log: &LifecycleLog, config: &LifecycleMinerConfig) -> LifecycleNet {
    let tree = discover_process_tree(log, config);
    synthesize_net(&tree, config.reduce_net)
}

fn build_net(tree: &ProcessTree) -> LifecycleNet {
    match tree {
        ProcessTree::Leaf(Some(a)) => LifecycleNet::single_transition(
            Some(a.label.clone()),
            Some(a.display_name().to_string()),
        ),
        ProcessTree::Leaf(None) => LifecycleNet::single_transition(None, None),
        ProcessTree::Cut { cut_type, children } => {
            let mut net = LifecycleNet::new();
            let placeholders: Vec<TransitionID> = children
                .iter()
                .map(|c| net.add_transition(Some(c.to_string()), None, None))
                .collect();
            match cut_type {
                CutType::Sequence => sequence_skeleton(&mut net, &placeholders),
                CutType::Exclusive => exclusive_skeleton(&mut net, &placeholders),
                CutType::Parallel => parallel_skeleton(&mut net, &placeholders),
                CutType::Interleaving => {
                    let shared = net.add_place(None);
                    for t in &placeholders {
                        net.add_arc(ArcType::place_to_transition(shared, *t));
                        net.add_arc(ArcType::transition_to_place(*t, shared));
                    }
                    parallel_skeleton(&mut net, &placeholders);
                }
                CutType::Loop => loop_skeleton(&mut net, &placeholders),
            }
            for (t, child) in placeholders.into_iter().zip(children) {
                net.splice(t, build_net(child));
            }
            net
        }
    }
}

fn sequence_skeleton(net: &mut LifecycleNet, steps: &[TransitionID]) {
    let mut previous = net.initial_place();
    for (i, t) in steps.iter().enumerate() {
        net.add_arc(ArcType::place_to_transition(previous, *t));
        let next = if i + 1 == steps.len() {
            net.final_place()
        } else {
            net.add_place(None)
        };
        net.add_arc(ArcType::transition_to_place(*t, next));
        previous = next;
    }
}

fn exclusive_skeleton(net: &mut LifecycleNet, choices: &[TransitionID]) {
    let (initial, last) = (net.initial_place(), net.final_place());
    for t in choices {
        net.add_arc(ArcType::place_to_transition(initial, *t));
        net.add_arc(ArcType::transition_to_place(*t, last));
    }
}

fn parallel_skeleton(net: &mut LifecycleNet, branches: &[TransitionID]) {
    let split = net.add_silent_transition();
    let join = net.add_silent_transition();
    net.add_arc(ArcType::place_to_transition(net.initial_place(), split));
    net.add_arc(ArcType::transition_to_place(join, net.final_place()));
    for t in branches {
        let before = net.add_place(None);
        let after = net.add_place(None);
        net.add_arc(ArcType::transition_to_place(split, before));
        net.add_arc(ArcType::place_to_transition(before, *t));
        net.add_arc(ArcType::transition_to_place(*t, after));
        net.add_arc(ArcType::place_to_transition(after, join));
    }
}

/// `do` is the first child, every further child is a redo part
fn loop_skeleton(net: &mut LifecycleNet, children: &[TransitionID]) {
    let Some((do_part, redo_parts)) = children.split_first() else {
        return;
    };
    let enter = net.add_silent_transition();
    let exit = net.add_silent_transition();
    let loop_start = net.add_place(None);
    let loop_end = net.add_place(None);
    net.add_arc(ArcType::place_to_transition(net.initial_place(), enter));
    net.add_arc(ArcType::transition_to_place(enter, loop_start));
    net.add_arc(ArcType::place_to_transition(loop_start, *do_part));
    net.add_arc(ArcType::transition_to_place(*do_part, loop_end));
    net.add_arc(ArcType::place_to_transition(loop_end, exit));
    net.add_arc(ArcType::transition_to_place(exit, net.final_place()));
    for redo in redo_parts {
        net.add_arc(ArcType::place_to_transition(loop_end, *redo));
        net.add_arc(ArcType::transition_to_place(*redo, loop_start));
    }
}
