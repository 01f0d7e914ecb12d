//! Engine configuration

/// What the script runner does after a statement fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing statement
    #[default]
    Halt,
    /// Report the failure and keep going with the next statement
    Continue,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Script behaviour after a rejected statement
    pub on_error: ErrorPolicy,
    /// Store INTEGER literals in REAL columns instead of rejecting them
    pub promote_integers: bool,
    /// Auto-number INTEGER PRIMARY KEY columns that are omitted or NULL
    pub auto_primary_key: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Halt,
            promote_integers: true,
            auto_primary_key: true,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error policy
    pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Set whether integers are promoted into REAL columns
    pub fn promote_integers(mut self, enabled: bool) -> Self {
        self.promote_integers = enabled;
        self
    }

    /// Set whether integer primary keys are auto-numbered
    pub fn auto_primary_key(mut self, enabled: bool) -> Self {
        self.auto_primary_key = enabled;
        self
    }
}
