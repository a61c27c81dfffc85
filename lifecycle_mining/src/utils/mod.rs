#[cfg(test)]
pub mod test_utils {
    use crate::core::event_data::lifecycle::{Activity, Lifecycle, LifecycleLog, Trace};

    /// `"a b c"`: one start/complete pair per label
    pub fn pairs(labels: &str) -> Trace {
        Trace::new(
            labels
                .split_whitespace()
                .flat_map(|l| [Activity::start(l), Activity::complete(l)])
                .collect(),
        )
    }

    /// `"a+ b+ a- b-"`: `+` marks a start, `-` a complete, no suffix a collapsed activity
    pub fn events(spec: &str) -> Trace {
        Trace::new(
            spec.split_whitespace()
                .map(|token| {
                    if let Some(label) = token.strip_suffix('+') {
                        Activity::start(label)
                    } else if let Some(label) = token.strip_suffix('-') {
                        Activity::complete(label)
                    } else {
                        Activity::new(token, Lifecycle::Default)
                    }
                })
                .collect(),
        )
    }

    /// Log of [`pairs`] traces
    pub fn pair_log(traces: &[&str]) -> LifecycleLog {
        LifecycleLog::new(traces.iter().map(|t| pairs(t)).collect())
    }

    /// Collapsed activity with the given label
    pub fn act(label: &str) -> Activity {
        Activity::new(label, Lifecycle::Default)
    }
}
