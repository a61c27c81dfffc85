use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// Label of the silent activity (τ)
pub const SILENT_LABEL: &str = "τ";

///
/// Lifecycle marker of an [`Activity`] occurrence
///
/// [`Lifecycle::Default`] is the marker-erased view used as alphabet element
/// in directly-follows graphs, concurrency graphs and partitions.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Activity instance started
    Start,
    /// Activity instance completed
    Complete,
    /// Collapsed (marker-erased) activity
    Default,
}

impl Lifecycle {
    fn suffix(&self) -> Option<&'static str> {
        match self {
            Lifecycle::Start => Some("s"),
            Lifecycle::Complete => Some("c"),
            Lifecycle::Default => None,
        }
    }
}

///
/// An activity with a lifecycle marker
///
/// Identity (equality, hashing and ordering) is given by the label and the
/// [`Lifecycle`] marker only. The optional display name is carried along but
/// never compared.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity label, acting as identifier
    pub label: String,
    /// Lifecycle marker
    pub lifecycle: Lifecycle,
    /// Human-readable name (falls back to the label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Activity {
    /// Create a new [`Activity`] without a display name
    pub fn new<S: Into<String>>(label: S, lifecycle: Lifecycle) -> Self {
        Self {
            label: label.into(),
            lifecycle,
            name: None,
        }
    }

    /// Create a new [`Activity`] with a display name
    pub fn with_name<S: Into<String>, N: Into<String>>(
        label: S,
        lifecycle: Lifecycle,
        name: N,
    ) -> Self {
        Self {
            label: label.into(),
            lifecycle,
            name: Some(name.into()),
        }
    }

    /// Start event of the activity with the given label
    pub fn start<S: Into<String>>(label: S) -> Self {
        Self::new(label, Lifecycle::Start)
    }

    /// Complete event of the activity with the given label
    pub fn complete<S: Into<String>>(label: S) -> Self {
        Self::new(label, Lifecycle::Complete)
    }

    /// The silent start/complete pair `[τ_s, τ_c]`
    pub fn silent_pair() -> Vec<Activity> {
        vec![Self::start(SILENT_LABEL), Self::complete(SILENT_LABEL)]
    }

    /// The collapsed silent activity `τ`
    pub fn silent() -> Self {
        Self::new(SILENT_LABEL, Lifecycle::Default)
    }

    /// Display name, or the label if no name is set
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }

    /// Returns `true` if this is a (start, complete or default) silent activity
    pub fn is_silent(&self) -> bool {
        self.label == SILENT_LABEL
    }

    /// Returns `true` if this is a start event
    pub fn is_start(&self) -> bool {
        self.lifecycle == Lifecycle::Start
    }

    /// Returns `true` if this is a complete event
    pub fn is_complete(&self) -> bool {
        self.lifecycle == Lifecycle::Complete
    }

    /// Marker-erased view of this activity
    pub fn as_default(&self) -> Self {
        self.with_lifecycle(Lifecycle::Default)
    }

    /// Start view of this activity
    pub fn as_start(&self) -> Self {
        self.with_lifecycle(Lifecycle::Start)
    }

    /// Complete view of this activity
    pub fn as_complete(&self) -> Self {
        self.with_lifecycle(Lifecycle::Complete)
    }

    fn with_lifecycle(&self, lifecycle: Lifecycle) -> Self {
        Self {
            label: self.label.clone(),
            lifecycle,
            name: self.name.clone(),
        }
    }
}

impl PartialEq for Activity {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.lifecycle == other.lifecycle
    }
}

impl Eq for Activity {}

impl Hash for Activity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.lifecycle.hash(state);
    }
}

impl PartialOrd for Activity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Activity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label
            .cmp(&other.label)
            .then(self.lifecycle.cmp(&other.lifecycle))
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lifecycle.suffix() {
            Some(suffix) => write!(f, "{}_{}", self.label, suffix),
            None => write!(f, "{}", self.label),
        }
    }
}
