//! Error types for grammar compilation, argv matching and configuration.
//!
//! Two failure domains are kept apart: a [`GrammarError`] means the doc text
//! itself is malformed (an authoring defect), while a [`UserError`] means a
//! live argument vector does not satisfy a valid grammar. Option resolution
//! is shared between both sides, so its failures are a separate
//! [`FlagError`] that either domain wraps.

use thiserror::Error;

/// Failures while resolving an option word against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// A long option matches several registry entries.
    #[error("{flag} is not a unique prefix: {candidates}?")]
    NotUniquePrefix { flag: String, candidates: String },
    /// A short option is declared more than once.
    #[error("{flag} is specified ambiguously {count} times")]
    AmbiguousShort { flag: String, count: usize },
    /// A long option, given in full, is declared more than once.
    #[error("{flag} is specified ambiguously {count} times")]
    AmbiguousLong { flag: String, count: usize },
    /// `--flag=value` given for a zero-arity option.
    #[error("{0} must not have an argument")]
    UnexpectedArgument(String),
    /// A one-arity option with nothing left to consume.
    #[error("{0} requires argument")]
    MissingArgument(String),
}

/// The doc text cannot be compiled into a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("\"usage:\" (case-insensitive) not found")]
    MissingUsage,
    #[error("more than one \"usage:\" (case-insensitive)")]
    DuplicateUsage,
    #[error("usage section does not name a program")]
    EmptyUsage,
    #[error("unmatched '{0}'")]
    Unmatched(String),
    #[error("unexpected ending: {0:?}")]
    UnexpectedEnding(String),
    #[error("invalid option in usage: {0}")]
    Flag(#[from] FlagError),
}

/// A live argument vector does not satisfy the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error(transparent)]
    Flag(#[from] FlagError),
    /// The grammar matched but some tokens were left over.
    #[error("unexpected arguments: {0}")]
    UnexpectedArguments(String),
    #[error("arguments do not match any usage pattern")]
    NoMatch,
}

/// Errors loading [`ParseOptions`](crate::ParseOptions) from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_error_display() {
        let err = FlagError::NotUniquePrefix {
            flag: "--ver".into(),
            candidates: "--version, --verbose".into(),
        };
        assert_eq!(
            err.to_string(),
            "--ver is not a unique prefix: --version, --verbose?"
        );
        assert_eq!(
            FlagError::MissingArgument("-p".into()).to_string(),
            "-p requires argument"
        );
        assert_eq!(
            FlagError::AmbiguousShort {
                flag: "-x".into(),
                count: 2
            }
            .to_string(),
            "-x is specified ambiguously 2 times"
        );
    }

    #[test]
    fn test_user_error_is_transparent_over_flag_error() {
        let err: UserError = FlagError::UnexpectedArgument("--foo".into()).into();
        assert_eq!(err.to_string(), "--foo must not have an argument");
    }

    #[test]
    fn test_grammar_error_wraps_flag_error_as_source() {
        let err: GrammarError = FlagError::MissingArgument("-o".into()).into();
        assert_eq!(err.to_string(), "invalid option in usage: -o requires argument");
        assert!(std::error::Error::source(&err).is_some());
    }
}
