use std::fmt;

/// Raised when a `$ref` or `$defs`/`definitions` pointer doesn't resolve, or
/// when `extractNodeSubSchema` walks off the end of a schema that doesn't
/// have the section it's asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRefError {
    pub pointer: String,
}

impl UnresolvedRefError {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self { pointer: pointer.into() }
    }
}

impl fmt::Display for UnresolvedRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved schema reference: {}", self.pointer)
    }
}

impl std::error::Error for UnresolvedRefError {}
