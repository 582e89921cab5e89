use std::fmt;

/// One failure of one field against one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Bracketed field path, e.g. `[teachers][2]`
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
