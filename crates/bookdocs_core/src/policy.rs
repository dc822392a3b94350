/// What a run does when one file's pipeline fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the whole run at the first failing file.
    #[default]
    FailFast,
    /// Log the failure, record it, and move on to the next file.
    Continue,
}

impl ErrorPolicy {
    pub fn is_fail_fast(self) -> bool {
        matches!(self, ErrorPolicy::FailFast)
    }
}
