use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::event_data::lifecycle::SILENT_LABEL;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Hash, Eq, PartialOrd, Ord)]
/// Place in a [`LifecycleNet`]
pub struct Place {
    id: Uuid,
    /// Name (`P<index>`, following the insertion order of the net)
    pub name: String,
}

impl Place {
    /// ID of this place
    pub fn id(&self) -> PlaceID {
        PlaceID(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Hash, Eq, PartialOrd, Ord)]
/// Transition in a [`LifecycleNet`]
pub struct Transition {
    /// Transition label (None if this transition is _silent_)
    pub label: Option<String>,
    /// Display name
    pub name: String,
    id: Uuid,
}

impl Transition {
    /// ID of this transition
    pub fn id(&self) -> TransitionID {
        TransitionID(self.id)
    }

    /// Returns `true` if this transition is silent (τ)
    pub fn is_silent(&self) -> bool {
        self.label.is_none()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a [`LifecycleNet`]
pub enum ArcType {
    /// From Place to Transition
    PlaceTransition(Uuid, Uuid),
    /// From Transition to Place
    TransitionPlace(Uuid, Uuid),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: PlaceID, to: TransitionID) -> ArcType {
        ArcType::PlaceTransition(from.0, to.0)
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: TransitionID, to: PlaceID) -> ArcType {
        ArcType::TransitionPlace(from.0, to.0)
    }
    /// Checks if a given node ID is start or end of this arc
    pub fn contains(&self, id: &Uuid) -> bool {
        match self {
            ArcType::PlaceTransition(from, to) => from == id || to == id,
            ArcType::TransitionPlace(from, to) => from == id || to == id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// Arc in a [`LifecycleNet`]
///
/// Connecting a transition and a place (or the other way around)
pub struct Arc {
    /// Source and target of Arc
    pub from_to: ArcType,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
/// Place ID
pub struct PlaceID(pub Uuid);

impl PlaceID {
    /// Get UUID
    pub fn get_uuid(self) -> Uuid {
        self.0
    }
}

impl From<&Place> for PlaceID {
    fn from(value: &Place) -> Self {
        PlaceID(value.id)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
/// Transition ID
pub struct TransitionID(pub Uuid);

impl TransitionID {
    /// Get UUID
    pub fn get_uuid(self) -> Uuid {
        self.0
    }
}

impl From<&Transition> for TransitionID {
    fn from(value: &Transition) -> Self {
        TransitionID(value.id)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
///
/// A net of [`Place`]s and [`Transition`]s synthesized from a process tree
///
/// The first place is the unique initial place (no incoming arcs), the
/// second one the unique final place (no outgoing arcs). Places keep their
/// insertion order and are named `P<index>` accordingly. Arcs are never
/// duplicated. The net carries no marking: it is a structural model only.
///
pub struct LifecycleNet {
    /// Places (index 0: initial place, index 1: final place)
    pub places: Vec<Place>,
    /// Transitions
    pub transitions: HashMap<Uuid, Transition>,
    /// Arcs
    pub arcs: Vec<Arc>,
}

impl Default for LifecycleNet {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleNet {
    /// Create new [`LifecycleNet`] with only its initial and final place
    pub fn new() -> Self {
        let mut net = Self {
            places: Vec::new(),
            transitions: HashMap::new(),
            arcs: Vec::new(),
        };
        net.add_place(None);
        net.add_place(None);
        net
    }

    ///
    /// Net with a single transition between the initial and the final place
    ///
    /// `label` is `None` for a silent transition.
    ///
    pub fn single_transition(label: Option<String>, name: Option<String>) -> Self {
        let mut net = Self::new();
        let t = net.add_transition(label, name, None);
        net.add_arc(ArcType::place_to_transition(net.initial_place(), t));
        net.add_arc(ArcType::transition_to_place(t, net.final_place()));
        net
    }

    /// Initial place
    pub fn initial_place(&self) -> PlaceID {
        self.places[0].id()
    }

    /// Final place
    pub fn final_place(&self) -> PlaceID {
        self.places[1].id()
    }

    /// Returns `true` for the initial and the final place
    pub fn is_reserved_place(&self, p: &PlaceID) -> bool {
        *p == self.initial_place() || *p == self.final_place()
    }

    /// Add a place (with an optional passed UUID)
    ///
    /// If no ID is passed, a new UUID will be generated
    pub fn add_place(&mut self, place_id: Option<Uuid>) -> PlaceID {
        let place_id = place_id.unwrap_or(Uuid::new_v4());
        self.places.push(Place {
            id: place_id,
            name: format!("P{}", self.places.len()),
        });
        PlaceID(place_id)
    }

    /// Add a transition with a label and display name (and with an optional passed UUID)
    ///
    /// The display name defaults to the label (τ for silent transitions).
    pub fn add_transition(
        &mut self,
        label: Option<String>,
        name: Option<String>,
        transition_id: Option<Uuid>,
    ) -> TransitionID {
        let transition_id = transition_id.unwrap_or(Uuid::new_v4());
        let name = name
            .or_else(|| label.clone())
            .unwrap_or_else(|| SILENT_LABEL.to_string());
        self.transitions.insert(
            transition_id,
            Transition {
                id: transition_id,
                label,
                name,
            },
        );
        TransitionID(transition_id)
    }

    /// Add a silent transition
    pub fn add_silent_transition(&mut self) -> TransitionID {
        self.add_transition(None, None, None)
    }

    /// Add an arc, unless it is already part of the net
    ///
    /// Returns `false` if the arc already existed.
    pub fn add_arc(&mut self, from_to: ArcType) -> bool {
        if self.contains_arc(&from_to) {
            return false;
        }
        self.arcs.push(Arc { from_to });
        true
    }

    /// Checks if the net contains the given arc
    pub fn contains_arc(&self, from_to: &ArcType) -> bool {
        self.arcs.iter().any(|a| &a.from_to == from_to)
    }

    /// Get a place by ID
    pub fn place(&self, p: &PlaceID) -> Option<&Place> {
        self.places.iter().find(|x| x.id == p.0)
    }

    /// Get a transition by ID
    pub fn transition(&self, t: &TransitionID) -> Option<&Transition> {
        self.transitions.get(&t.0)
    }

    /// Remove any node (Transition/Place) and all its arcs
    pub fn remove_node(&mut self, id: &Uuid) {
        self.places.retain(|p| &p.id != id);
        self.transitions.remove(id);
        self.arcs.retain(|arc| !arc.from_to.contains(id));
    }

    /// Rename all places to `P<index>` following their current order
    pub fn renumber_places(&mut self) {
        for (i, p) in self.places.iter_mut().enumerate() {
            p.name = format!("P{}", i);
        }
    }

    /// Get the preset of a place
    pub fn preset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::TransitionPlace(from, to) if to == p.0 => Some(TransitionID(from)),
                _ => None,
            })
            .collect()
    }

    /// Get the preset of a transition
    pub fn preset_of_transition(&self, t: TransitionID) -> Vec<PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::PlaceTransition(from, to) if to == t.0 => Some(PlaceID(from)),
                _ => None,
            })
            .collect()
    }

    /// Get the postset of a place
    pub fn postset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::PlaceTransition(from, to) if from == p.0 => Some(TransitionID(to)),
                _ => None,
            })
            .collect()
    }

    /// Get the postset of a transition
    pub fn postset_of_transition(&self, t: TransitionID) -> Vec<PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::TransitionPlace(from, to) if from == t.0 => Some(PlaceID(to)),
                _ => None,
            })
            .collect()
    }

    /// Places without incoming arcs
    pub fn source_places(&self) -> Vec<PlaceID> {
        self.places
            .iter()
            .map(Place::id)
            .filter(|p| self.preset_of_place(*p).is_empty())
            .collect()
    }

    /// Places without outgoing arcs
    pub fn sink_places(&self) -> Vec<PlaceID> {
        self.places
            .iter()
            .map(Place::id)
            .filter(|p| self.postset_of_place(*p).is_empty())
            .collect()
    }

    /// Silent transitions
    pub fn silent_transitions(&self) -> Vec<TransitionID> {
        self.transitions
            .values()
            .filter(|t| t.is_silent())
            .map(Transition::id)
            .collect()
    }

    /// Labels of all visible transitions, sorted
    pub fn visible_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .transitions
            .values()
            .filter_map(|t| t.label.as_deref())
            .collect();
        labels.sort_unstable();
        labels
    }

    ///
    /// Replace the (placeholder) transition `t` by the net `sub_net`
    ///
    /// The places before `t` are connected to every transition following the
    /// initial place of `sub_net`, and every transition preceding the final
    /// place of `sub_net` is connected to the places after `t`. All other
    /// places, transitions and arcs of `sub_net` are imported as they are.
    ///
    pub fn splice(&mut self, t: TransitionID, sub_net: LifecycleNet) {
        let source_places = self.preset_of_transition(t);
        let target_places = self.postset_of_transition(t);
        let sub_initial = sub_net.initial_place();
        let sub_final = sub_net.final_place();
        let sub_start_transitions = sub_net.postset_of_place(sub_initial);
        let sub_end_transitions = sub_net.preset_of_place(sub_final);

        self.remove_node(&t.0);

        for p in &source_places {
            for s in &sub_start_transitions {
                self.add_arc(ArcType::place_to_transition(*p, *s));
            }
        }
        for e in &sub_end_transitions {
            for p in &target_places {
                self.add_arc(ArcType::transition_to_place(*e, *p));
            }
        }

        let LifecycleNet {
            places,
            transitions,
            arcs,
        } = sub_net;
        self.places.extend(places.into_iter().skip(2));
        self.transitions.extend(transitions);
        for arc in arcs {
            if !arc.from_to.contains(&sub_initial.0) && !arc.from_to.contains(&sub_final.0) {
                self.add_arc(arc.from_to);
            }
        }
        self.renumber_places();
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_transition_net() {
        let net = LifecycleNet::single_transition(Some("a".into()), Some("Approve".into()));
        assert_eq!(net.places.len(), 2);
        assert_eq!(net.arcs.len(), 2);
        assert_eq!(net.source_places(), vec![net.initial_place()]);
        assert_eq!(net.sink_places(), vec![net.final_place()]);
        let t = net.postset_of_place(net.initial_place())[0];
        assert_eq!(net.transition(&t).unwrap().name, "Approve");
        assert!(net.silent_transitions().is_empty());

        let silent = LifecycleNet::single_transition(None, None);
        assert_eq!(silent.silent_transitions().len(), 1);
        assert_eq!(silent.transitions.values().next().unwrap().name, SILENT_LABEL);
    }

    #[test]
    fn arcs_are_not_duplicated() {
        let mut net = LifecycleNet::new();
        let t = net.add_silent_transition();
        let arc = ArcType::place_to_transition(net.initial_place(), t);
        assert!(net.add_arc(arc));
        assert!(!net.add_arc(arc));
        assert_eq!(net.arcs.len(), 1);
    }

    #[test]
    fn splice_replaces_placeholder() {
        let mut net = LifecycleNet::new();
        let placeholder = net.add_transition(Some("→(a,b)".into()), None, None);
        net.add_arc(ArcType::place_to_transition(net.initial_place(), placeholder));
        net.add_arc(ArcType::transition_to_place(placeholder, net.final_place()));

        let mut sub = LifecycleNet::new();
        let a = sub.add_transition(Some("a".into()), None, None);
        let b = sub.add_transition(Some("b".into()), None, None);
        let middle = sub.add_place(None);
        sub.add_arc(ArcType::place_to_transition(sub.initial_place(), a));
        sub.add_arc(ArcType::transition_to_place(a, middle));
        sub.add_arc(ArcType::place_to_transition(middle, b));
        sub.add_arc(ArcType::transition_to_place(b, sub.final_place()));

        net.splice(placeholder, sub);
        assert!(net.transition(&placeholder).is_none());
        assert_eq!(net.places.len(), 3);
        assert_eq!(net.places[2].name, "P2");
        assert_eq!(net.arcs.len(), 4);
        assert_eq!(net.visible_labels(), vec!["a", "b"]);
        assert_eq!(net.postset_of_place(net.initial_place()), vec![a]);
        assert_eq!(net.preset_of_place(net.final_place()), vec![b]);
        assert_eq!(net.source_places(), vec![net.initial_place()]);
        assert_eq!(net.sink_places(), vec![net.final_place()]);
    }

    #[test]
    fn remove_node_drops_arcs_and_renumbers() {
        let mut net = LifecycleNet::new();
        let t = net.add_silent_transition();
        let p = net.add_place(None);
        let q = net.add_place(None);
        net.add_arc(ArcType::place_to_transition(p, t));
        net.add_arc(ArcType::transition_to_place(t, q));
        net.remove_node(&p.get_uuid());
        net.renumber_places();
        assert_eq!(net.arcs.len(), 1);
        assert_eq!(net.place(&q).unwrap().name, "P2");
        assert!(net.place(&p).is_none());
    }
}
