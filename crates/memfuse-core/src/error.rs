use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigOutOfRange,
    RoutingDecodeFailed,
    ResultEncodeFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::ConfigOutOfRange => "E1004",
            Self::RoutingDecodeFailed => "E4001",
            Self::ResultEncodeFailed => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigOutOfRange => "Fusion option out of range",
            Self::RoutingDecodeFailed => "Routing result could not be decoded",
            Self::ResultEncodeFailed => "Fused result could not be encoded",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .memfuse/config.toml and retry."),
            Self::ConfigOutOfRange => Some(
                "Use dedup_threshold in (0, 1], min_score in [0, 1], and a non-negative max_tokens.",
            ),
            Self::RoutingDecodeFailed => {
                Some("Check that the router emits camelCase fields and lowercase layer names.")
            }
            Self::ResultEncodeFailed => Some("Check item metadata for non-serializable values."),
        }
    }
}

impl ErrorCode {
    /// `"<code>: <detail> (hint: ...)"`, the context line attached to
    /// errors surfaced from loaders and codecs.
    #[must_use]
    pub fn annotate(self, detail: impl fmt::Display) -> String {
        match self.hint() {
            Some(hint) => format!("{}: {detail} (hint: {hint})", self.code()),
            None => format!("{}: {detail}", self.code()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A fusion option that strict validation refuses.
///
/// The lenient path ([`FusionOptions::apply`](crate::FusionOptions::apply))
/// clamps instead of producing this.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("dedup_threshold must be in (0, 1], got {0}")]
    DedupThreshold(f32),

    #[error("min_score must be in [0, 1], got {0}")]
    MinScore(f32),

    #[error("max_tokens must be non-negative, got {0}")]
    MaxTokens(i64),
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::ConfigOutOfRange
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::ConfigOutOfRange,
            ErrorCode::RoutingDecodeFailed,
            ErrorCode::ResultEncodeFailed,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::ConfigOutOfRange.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn annotate_carries_code_detail_and_hint() {
        let line = ErrorCode::RoutingDecodeFailed.annotate("bad input");
        assert!(line.starts_with("E4001: bad input"), "{line}");
        assert!(line.contains("(hint: Check that the router emits camelCase"), "{line}");
    }

    #[test]
    fn config_error_messages_name_the_option() {
        assert_eq!(
            ConfigError::DedupThreshold(1.5).to_string(),
            "dedup_threshold must be in (0, 1], got 1.5"
        );
        assert_eq!(ConfigError::MaxTokens(-3).code(), ErrorCode::ConfigOutOfRange);
    }
}
