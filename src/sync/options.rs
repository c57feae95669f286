// ============================================================================
// spark-selection - Sync Options
// ============================================================================

/// Options for a [`SyncEngine`](super::SyncEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Whether a control bound to a list without a change feed still writes
    /// its own selection changes into that list. Such a list is copied into
    /// the control once at attach time either way.
    pub mirror_unobservable: bool,
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mirror_unobservable(mut self, value: bool) -> Self {
        self.mirror_unobservable = value;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            mirror_unobservable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_everything() {
        assert!(SyncOptions::default().mirror_unobservable);
        assert!(!SyncOptions::new().mirror_unobservable(false).mirror_unobservable);
    }
}
