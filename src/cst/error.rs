use std::fmt;

/// A structured parse error with 1-based line/column, matching the teacher's
/// `MermaidFlowchartParseError` convention of naming the offending line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl YamlParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for YamlParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "YAML parse error at {}:{}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for YamlParseError {}
