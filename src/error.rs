use std::fmt;

/// Result type alias for document operations
pub type ParseResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading, querying, mutating or saving a document
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Parse error from pest
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// A quoted value with no closing quote before the end of its line
    UnterminatedString { line: usize, column: usize },

    /// Stored value text does not match the requested type
    TypeError {
        key: String,
        expected: String,
        found: String,
    },

    /// Key not present in the document
    KeyNotFound { key: String },

    /// Key cannot be written back as `key` or `section/key`
    InvalidKey { key: String },

    /// Value cannot be written back without changing its meaning
    InvalidValue { key: String, reason: String },

    /// File I/O error
    IoError { path: String, message: String },

    /// Custom error with message
    Custom { message: String },
}

impl ConfigError {
    /// Create a parse error
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an unterminated string error
    pub fn unterminated_string(line: usize, column: usize) -> Self {
        ConfigError::UnterminatedString { line, column }
    }

    /// Create a type error
    pub fn type_error(
        key: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ConfigError::TypeError {
            key: key.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a key not found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        ConfigError::KeyNotFound { key: key.into() }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        ConfigError::InvalidKey { key: key.into() }
    }

    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a custom error
    pub fn custom(message: impl Into<String>) -> Self {
        ConfigError::Custom {
            message: message.into(),
        }
    }

    /// True for a lookup miss, which callers usually treat as "use a default"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound { .. })
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError {
                line,
                column,
                message,
            } => {
                write!(
                    f,
                    "Parse error at line {}, column {}: {}",
                    line, column, message
                )
            }
            ConfigError::UnterminatedString { line, column } => {
                write!(
                    f,
                    "Unterminated string starting at line {}, column {}",
                    line, column
                )
            }
            ConfigError::TypeError {
                key,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Type error for '{}': expected {}, found {}",
                    key, expected, found
                )
            }
            ConfigError::KeyNotFound { key } => {
                write!(f, "Configuration key '{}' not found", key)
            }
            ConfigError::InvalidKey { key } => {
                write!(f, "Invalid key '{}': expected key or section/key", key)
            }
            ConfigError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for '{}': {}", key, reason)
            }
            ConfigError::IoError { path, message } => {
                write!(f, "I/O error for '{}': {}", path, message)
            }
            ConfigError::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl<R: pest::RuleType> From<pest::error::Error<R>> for ConfigError {
    fn from(err: pest::error::Error<R>) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos((line, col)) => (line, col),
            pest::error::LineColLocation::Span((line, col), _) => (line, col),
        };

        ConfigError::parse(line, column, err.variant.to_string())
    }
}
