/// Bounds on how many crash reports are kept and for how long.
///
/// Immutable for the process lifetime; both fields are clamped to at
/// least 1 so a misconfigured policy can never delete everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_files: usize,
    pub retention_days: u64,
}

impl RetentionPolicy {
    #[must_use]
    pub const fn new(max_files: usize, retention_days: u64) -> Self {
        Self {
            max_files: if max_files == 0 { 1 } else { max_files },
            retention_days: if retention_days == 0 { 1 } else { retention_days },
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(10, 30)
    }
}
