//! Structural reduction of silent steps in a [`LifecycleNet`]
//!
//! Every reduction step is tried on a copy of the net and only committed if
//! it applies cleanly. A skipped step leaves the net untouched.

use tracing::{trace, warn};
use uuid::Uuid;

use super::petri_net_struct::{ArcType, LifecycleNet, PlaceID, TransitionID};

/// Reason why a single reduction step was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionSkip {
    /// A node referenced by the step is not part of the net
    MissingNode(Uuid),
    /// The step would remove the initial or final place
    ReservedPlace(PlaceID),
    /// The step would connect two nodes that are already connected
    WouldDuplicateArc,
    /// The node does not have the shape required by the step
    NotApplicable,
}

impl std::fmt::Display for ReductionSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReductionSkip::MissingNode(id) => write!(f, "Node {} not found", id),
            ReductionSkip::ReservedPlace(p) => write!(f, "Place {} is reserved", p.0),
            ReductionSkip::WouldDuplicateArc => write!(f, "Reduction would duplicate an arc"),
            ReductionSkip::NotApplicable => write!(f, "Reduction not applicable"),
        }
    }
}

impl std::error::Error for ReductionSkip {}

impl LifecycleNet {
    ///
    /// Remove a silent transition with exactly one input and one output place
    ///
    /// One of the two places is merged into the other: the input place if the
    /// transition is its only consumer, otherwise the output place if the
    /// transition is its only producer. The initial and final place are never
    /// removed.
    ///
    pub fn remove_silent_transition(&mut self, t: TransitionID) -> Result<(), ReductionSkip> {
        let transition = self
            .transition(&t)
            .ok_or(ReductionSkip::MissingNode(t.0))?;
        if !transition.is_silent() {
            return Err(ReductionSkip::NotApplicable);
        }
        let (p_in, p_out) = match (
            self.preset_of_transition(t).as_slice(),
            self.postset_of_transition(t).as_slice(),
        ) {
            ([p_in], [p_out]) if p_in != p_out => (*p_in, *p_out),
            _ => return Err(ReductionSkip::NotApplicable),
        };
        for p in [p_in, p_out] {
            if self.place(&p).is_none() {
                return Err(ReductionSkip::MissingNode(p.0));
            }
        }

        if self.postset_of_place(p_in) == [t] && !self.is_reserved_place(&p_in) {
            // p_in is merged into p_out
            let producers = self.preset_of_place(p_in);
            if producers
                .iter()
                .any(|x| self.contains_arc(&ArcType::transition_to_place(*x, p_out)))
            {
                return Err(ReductionSkip::WouldDuplicateArc);
            }
            self.remove_node(&t.0);
            self.remove_node(&p_in.0);
            for x in producers {
                self.add_arc(ArcType::transition_to_place(x, p_out));
            }
        } else if self.preset_of_place(p_out) == [t] && !self.is_reserved_place(&p_out) {
            // p_out is merged into p_in
            let consumers = self.postset_of_place(p_out);
            if consumers
                .iter()
                .any(|y| self.contains_arc(&ArcType::place_to_transition(p_in, *y)))
            {
                return Err(ReductionSkip::WouldDuplicateArc);
            }
            self.remove_node(&t.0);
            self.remove_node(&p_out.0);
            for y in consumers {
                self.add_arc(ArcType::place_to_transition(p_in, y));
            }
        } else if self.is_reserved_place(&p_in) || self.is_reserved_place(&p_out) {
            let reserved = if self.is_reserved_place(&p_in) {
                p_in
            } else {
                p_out
            };
            return Err(ReductionSkip::ReservedPlace(reserved));
        } else {
            return Err(ReductionSkip::NotApplicable);
        }
        self.renumber_places();
        Ok(())
    }

    ///
    /// Remove a place between two silent transitions, together with the second one
    ///
    /// `t_in -> p -> t_out -> q` becomes `t_in -> q`, provided `p` has exactly
    /// one incoming and one outgoing arc, `t_in` has a single input place and
    /// `t_out` has `p` as its only input and `q` as its only output.
    ///
    pub fn merge_silent_chain(&mut self, p: PlaceID) -> Result<(), ReductionSkip> {
        if self.place(&p).is_none() {
            return Err(ReductionSkip::MissingNode(p.0));
        }
        if self.is_reserved_place(&p) {
            return Err(ReductionSkip::ReservedPlace(p));
        }
        let (t_in, t_out) = match (
            self.preset_of_place(p).as_slice(),
            self.postset_of_place(p).as_slice(),
        ) {
            ([t_in], [t_out]) if t_in != t_out => (*t_in, *t_out),
            _ => return Err(ReductionSkip::NotApplicable),
        };
        for t in [t_in, t_out] {
            match self.transition(&t) {
                None => return Err(ReductionSkip::MissingNode(t.0)),
                Some(tr) if !tr.is_silent() => return Err(ReductionSkip::NotApplicable),
                Some(_) => {}
            }
        }
        if self.preset_of_transition(t_in).len() != 1 || self.preset_of_transition(t_out) != [p] {
            return Err(ReductionSkip::NotApplicable);
        }
        let q = match self.postset_of_transition(t_out).as_slice() {
            [q] => *q,
            _ => return Err(ReductionSkip::NotApplicable),
        };
        if self.contains_arc(&ArcType::transition_to_place(t_in, q)) {
            return Err(ReductionSkip::WouldDuplicateArc);
        }
        self.remove_node(&p.0);
        self.remove_node(&t_out.0);
        self.add_arc(ArcType::transition_to_place(t_in, q));
        self.renumber_places();
        Ok(())
    }

    ///
    /// Apply silent-step reductions until none applies anymore
    ///
    /// Silent transitions are removed first (see
    /// [`LifecycleNet::remove_silent_transition`]), then places between silent
    /// transitions (see [`LifecycleNet::merge_silent_chain`]). Each step runs on
    /// a copy of the net that replaces the net only on success. Returns the
    /// number of applied steps.
    ///
    pub fn reduce(&mut self) -> usize {
        let mut applied = 0;
        while self.reduce_once() {
            applied += 1;
        }
        applied
    }

    fn reduce_once(&mut self) -> bool {
        let mut silent = self.silent_transitions();
        silent.sort();
        for t in silent {
            let mut candidate = self.clone();
            match candidate.remove_silent_transition(t) {
                Ok(()) => {
                    trace!("Removed silent transition {}", t.0);
                    *self = candidate;
                    return true;
                }
                Err(ReductionSkip::MissingNode(id)) => {
                    warn!("Skipping reduction of {}: node {} missing", t.0, id);
                }
                Err(skip) => trace!("Keeping silent transition {}: {}", t.0, skip),
            }
        }
        let places: Vec<PlaceID> = self.places.iter().skip(2).map(|p| p.id()).collect();
        for p in places {
            let mut candidate = self.clone();
            match candidate.merge_silent_chain(p) {
                Ok(()) => {
                    trace!("Merged silent steps around place {}", p.0);
                    *self = candidate;
                    return true;
                }
                Err(ReductionSkip::MissingNode(id)) => {
                    warn!("Skipping reduction of {}: node {} missing", p.0, id);
                }
                Err(_) => {}
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `P0 -> a -> P2 -> τ -> P3 -> b -> P1`
    fn silent_between_visible() -> (LifecycleNet, TransitionID) {
        let mut net = LifecycleNet::new();
        let a = net.add_transition(Some("a".into()), None, None);
        let b = net.add_transition(Some("b".into()), None, None);
        let tau = net.add_silent_transition();
        let p2 = net.add_place(None);
        let p3 = net.add_place(None);
        net.add_arc(ArcType::place_to_transition(net.initial_place(), a));
        net.add_arc(ArcType::transition_to_place(a, p2));
        net.add_arc(ArcType::place_to_transition(p2, tau));
        net.add_arc(ArcType::transition_to_place(tau, p3));
        net.add_arc(ArcType::place_to_transition(p3, b));
        net.add_arc(ArcType::transition_to_place(b, net.final_place()));
        (net, tau)
    }

    #[test]
    fn silent_transition_is_removed() {
        let (mut net, tau) = silent_between_visible();
        net.remove_silent_transition(tau).unwrap();
        assert_eq!(net.places.len(), 3);
        assert_eq!(net.transitions.len(), 2);
        assert_eq!(net.arcs.len(), 4);
        assert_eq!(net.places[2].name, "P2");
        assert_eq!(net.source_places(), vec![net.initial_place()]);
        assert_eq!(net.sink_places(), vec![net.final_place()]);
    }

    #[test]
    fn visible_transitions_are_kept() {
        let (mut net, _) = silent_between_visible();
        let a = net
            .transitions
            .values()
            .find(|t| t.label.as_deref() == Some("a"))
            .map(|t| t.id())
            .unwrap();
        assert_eq!(net.remove_silent_transition(a), Err(ReductionSkip::NotApplicable));
        let missing = TransitionID(Uuid::new_v4());
        assert!(matches!(
            net.remove_silent_transition(missing),
            Err(ReductionSkip::MissingNode(_))
        ));
    }

    #[test]
    fn reserved_places_are_kept() {
        let mut net = LifecycleNet::single_transition(None, None);
        let tau = net.silent_transitions()[0];
        assert!(matches!(
            net.remove_silent_transition(tau),
            Err(ReductionSkip::ReservedPlace(_))
        ));
        assert_eq!(net.reduce(), 0);
        assert_eq!(net.places.len(), 2);
    }

    #[test]
    fn duplicate_arcs_are_not_created() {
        // a already feeds P3, merging P2 into P3 would join two arcs
        let (mut net, tau) = silent_between_visible();
        let p2 = net.places[2].id();
        let p3 = net.places[3].id();
        let a = net.preset_of_place(p2)[0];
        net.add_arc(ArcType::transition_to_place(a, p3));
        assert_eq!(
            net.remove_silent_transition(tau),
            Err(ReductionSkip::WouldDuplicateArc)
        );
        let b = net.postset_of_place(p3)[0];
        net.add_arc(ArcType::place_to_transition(p2, b));
        assert_eq!(
            net.remove_silent_transition(tau),
            Err(ReductionSkip::NotApplicable)
        );
    }

    #[test]
    fn silent_chain_is_merged() {
        // P0 -> τ1 -> P2 -> τ2 -> P1
        let mut net = LifecycleNet::new();
        let t1 = net.add_silent_transition();
        let t2 = net.add_silent_transition();
        let p2 = net.add_place(None);
        net.add_arc(ArcType::place_to_transition(net.initial_place(), t1));
        net.add_arc(ArcType::transition_to_place(t1, p2));
        net.add_arc(ArcType::place_to_transition(p2, t2));
        net.add_arc(ArcType::transition_to_place(t2, net.final_place()));

        let mut merged = net.clone();
        merged.merge_silent_chain(p2).unwrap();
        assert_eq!(merged.places.len(), 2);
        assert_eq!(merged.transitions.len(), 1);
        assert!(merged.contains_arc(&ArcType::transition_to_place(t1, merged.final_place())));
        assert_eq!(
            merged.merge_silent_chain(merged.initial_place()),
            Err(ReductionSkip::ReservedPlace(merged.initial_place()))
        );

        let before = (net.places.len(), net.transitions.len());
        assert!(net.reduce() > 0);
        assert!(net.places.len() <= before.0);
        assert!(net.transitions.len() <= before.1);
        assert_eq!(net.source_places(), vec![net.initial_place()]);
        assert_eq!(net.sink_places(), vec![net.final_place()]);
    }
}
