use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::core::event_data::lifecycle::{Activity, SILENT_LABEL};

///
/// Operator of a composite [`ProcessTree`] node
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutType {
    /// Sequence operator (children in order)
    Sequence,
    /// Exclusive choice operator
    Exclusive,
    /// Parallel (concurrency) operator
    Parallel,
    /// Loop operator: first child is the do-part, second child the redo-part
    Loop,
    /// Interleaving operator: children in any order, never overlapping
    Interleaving,
}

impl CutType {
    /// Symbol used when rendering the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            CutType::Sequence => "→",
            CutType::Exclusive => "×",
            CutType::Parallel => "+",
            CutType::Loop => "◯",
            CutType::Interleaving => "<->",
        }
    }
}

impl Display for CutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

///
/// Process tree discovered by the lifecycle inductive miner
///
/// A tree is either a minimal leaf (holding one collapsed [`Activity`], or
/// none for the silent activity τ) or a cut with an ordered list of
/// children. Trees are immutable once constructed.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessTree {
    /// Minimal leaf (`None` is the silent activity)
    Leaf(Option<Activity>),
    /// Composite node
    Cut {
        /// Operator
        cut_type: CutType,
        /// Children (order is significant for sequences and loops)
        children: Vec<ProcessTree>,
    },
}

impl ProcessTree {
    /// Leaf for the given activity (collapsed to its default view)
    pub fn leaf(activity: Activity) -> Self {
        if activity.is_silent() {
            return Self::silent();
        }
        ProcessTree::Leaf(Some(activity.as_default()))
    }

    /// Silent leaf τ
    pub fn silent() -> Self {
        ProcessTree::Leaf(None)
    }

    /// Composite node
    pub fn cut(cut_type: CutType, children: Vec<ProcessTree>) -> Self {
        ProcessTree::Cut { cut_type, children }
    }

    /// Operator of this node (`None` for leaves)
    pub fn cut_type(&self) -> Option<CutType> {
        match self {
            ProcessTree::Leaf(_) => None,
            ProcessTree::Cut { cut_type, .. } => Some(*cut_type),
        }
    }

    /// Children of this node (empty for leaves)
    pub fn children(&self) -> &[ProcessTree] {
        match self {
            ProcessTree::Leaf(_) => &[],
            ProcessTree::Cut { children, .. } => children,
        }
    }

    /// Returns `true` for minimal leaves
    pub fn is_leaf(&self) -> bool {
        matches!(self, ProcessTree::Leaf(_))
    }

    /// Returns `true` for the silent leaf τ
    pub fn is_silent_leaf(&self) -> bool {
        matches!(self, ProcessTree::Leaf(None))
    }

    /// Number of operator levels (0 for a leaf)
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// All leaves, left to right
    pub fn leaves(&self) -> Vec<&ProcessTree> {
        match self {
            ProcessTree::Leaf(_) => vec![self],
            ProcessTree::Cut { children, .. } => children.iter().flat_map(|c| c.leaves()).collect(),
        }
    }

    /// Visible activities occurring in the leaves
    pub fn activities(&self) -> BTreeSet<Activity> {
        self.leaves()
            .into_iter()
            .filter_map(|l| match l {
                ProcessTree::Leaf(Some(a)) => Some(a.clone()),
                _ => None,
            })
            .collect()
    }

    /// Display name of a leaf (activity name or τ); `None` for cuts
    pub fn leaf_name(&self) -> Option<&str> {
        match self {
            ProcessTree::Leaf(Some(a)) => Some(a.display_name()),
            ProcessTree::Leaf(None) => Some(SILENT_LABEL),
            ProcessTree::Cut { .. } => None,
        }
    }
}

impl Display for ProcessTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessTree::Leaf(Some(a)) => write!(f, "{}", a.label),
            ProcessTree::Leaf(None) => write!(f, "{}", SILENT_LABEL),
            ProcessTree::Cut { cut_type, children } => {
                write!(f, "{}(", cut_type)?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::lifecycle::Lifecycle;
    use crate::utils::test_utils::act;

    fn flower() -> ProcessTree {
        ProcessTree::cut(
            CutType::Loop,
            vec![
                ProcessTree::cut(
                    CutType::Exclusive,
                    vec![ProcessTree::leaf(act("a")), ProcessTree::leaf(act("b"))],
                ),
                ProcessTree::silent(),
            ],
        )
    }

    #[test]
    fn renders_expression() {
        assert_eq!(flower().to_string(), "◯(×(a,b),τ)");
        let tree = ProcessTree::cut(
            CutType::Interleaving,
            vec![ProcessTree::leaf(act("x")), ProcessTree::leaf(act("y"))],
        );
        assert_eq!(tree.to_string(), "<->(x,y)");
        assert_eq!(ProcessTree::silent().to_string(), "τ");
    }

    #[test]
    fn leaves_are_collapsed() {
        let leaf = ProcessTree::leaf(Activity::with_name("a", Lifecycle::Start, "Approve"));
        assert_eq!(leaf.to_string(), "a");
        assert_eq!(leaf.leaf_name(), Some("Approve"));
        assert!(ProcessTree::leaf(Activity::silent()).is_silent_leaf());
    }

    #[test]
    fn structure_queries() {
        let tree = flower();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.cut_type(), Some(CutType::Loop));
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.leaves().len(), 3);
        assert_eq!(tree.activities().len(), 2);
        assert_eq!(ProcessTree::silent().depth(), 0);
        assert!(ProcessTree::silent().children().is_empty());
    }
}
