//! Option descriptors, bound values and argv tokens.
//!
//! These are the leaf-level types shared by the grammar side (what a usage
//! text declares) and the argv side (what a live invocation supplies).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value bound to a declared name.
///
/// Zero-arity options bind [`Bool`](Value::Bool), repeated flags and
/// commands bind [`Count`](Value::Count), arguments and one-arity options
/// bind [`Str`](Value::Str) (or [`List`](Value::List) when repeated), and
/// anything never seen binds [`Null`](Value::Null).
///
/// Serializes untagged, so a bindings map renders as plain JSON:
///
/// ```
/// use docgram_core::Value;
///
/// assert_eq!(Value::Count(2).as_count(), Some(2));
/// assert!(Value::Str("x".into()).is_truthy());
/// assert!(!Value::Null.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value bound (e.g. an absent `<arg>`).
    #[default]
    Null,
    /// Flag presence.
    Bool(bool),
    /// Number of occurrences of a repeated flag or command.
    Count(u64),
    /// A single string value.
    Str(String),
    /// Every value of a repeated argument or option.
    List(Vec<String>),
}

impl Value {
    /// Returns the boolean, treating a positive count as `true`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Count(n) => Some(*n > 0),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Value::Count(n) => Some(*n),
            Value::Bool(b) => Some(u64::from(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness used for built-in flag detection: `true`, a non-zero
    /// count, a non-empty string or a non-empty list.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Count(n) => *n > 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Count(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Canonical descriptor of a command-line option.
///
/// An option has an optional short form (`-v`) and/or long form
/// (`--verbose`), an arity of zero or one argument, and an optional literal
/// `[default: ...]` text taken from the options section.
///
/// # Examples
///
/// ```
/// use docgram_core::{OptionSpec, Value};
///
/// let verbose = OptionSpec::flag(Some("-v"), Some("--verbose"));
/// assert_eq!(verbose.name(), "--verbose");
/// assert_eq!(verbose.initial_value(), Value::Bool(false));
///
/// let speed = OptionSpec::with_argument(None, Some("--speed")).with_default("10");
/// assert_eq!(speed.initial_value(), Value::Str("10".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Short form (e.g. "-o")
    pub short: Option<String>,
    /// Long form (e.g. "--output")
    pub long: Option<String>,
    /// Whether the option takes exactly one argument
    pub takes_value: bool,
    /// Literal text of a `[default: ...]` annotation
    pub default: Option<String>,
}

impl OptionSpec {
    /// Creates a zero-arity option.
    pub fn flag(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            takes_value: false,
            default: None,
        }
    }

    /// Creates a one-arity option.
    pub fn with_argument(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            takes_value: true,
            ..Self::flag(short, long)
        }
    }

    /// Attaches a `[default: ...]` value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Identity key: the long form when present, otherwise the short form.
    pub fn name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
    }

    /// Checks whether `flag` is either of this option's forms.
    pub fn matches(&self, flag: &str) -> bool {
        self.short.as_deref() == Some(flag) || self.long.as_deref() == Some(flag)
    }

    /// Value bound when the option never appears on the command line.
    pub fn initial_value(&self) -> Value {
        if !self.takes_value {
            return Value::Bool(false);
        }
        match &self.default {
            Some(default) => Value::Str(default.clone()),
            None => Value::Null,
        }
    }
}

impl fmt::Display for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.short, &self.long) {
            (Some(short), Some(long)) => write!(f, "{short}, {long}")?,
            (Some(short), None) => f.write_str(short)?,
            (None, Some(long)) => f.write_str(long)?,
            (None, None) => f.write_str("?")?,
        }
        if self.takes_value {
            f.write_str(" <arg>")?;
        }
        Ok(())
    }
}

/// One element of a tokenized argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A resolved option occurrence, named by the option's identity key.
    Option { name: String, value: Value },
    /// A positional word; it is only named when a grammar leaf consumes it.
    Argument(String),
    /// A raw word whose option resolution failed. No grammar leaf accepts it.
    Invalid(String),
}

impl Token {
    /// Convenience constructor for a zero-arity option occurrence.
    pub fn flag(name: &str) -> Self {
        Token::Option {
            name: name.to_string(),
            value: Value::Bool(true),
        }
    }

    /// Convenience constructor for a one-arity option occurrence.
    pub fn option(name: &str, value: &str) -> Self {
        Token::Option {
            name: name.to_string(),
            value: Value::Str(value.to_string()),
        }
    }

    pub fn argument(value: &str) -> Self {
        Token::Argument(value.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Option {
                name,
                value: Value::Str(value),
            } => write!(f, "{name}={value}"),
            Token::Option { name, .. } => f.write_str(name),
            Token::Argument(raw) | Token::Invalid(raw) => f.write_str(raw),
        }
    }
}
