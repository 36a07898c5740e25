//! Option defaults registry built from "Options:" sections.
//!
//! Each entry of an options section declares one option:
//!
//! ```text
//! Options:
//!   -h --help         Show this screen.
//!   -o FILE, --output=FILE
//!                     Where to write [default: out.txt].
//! ```
//!
//! The declaration part is everything before the first run of two spaces
//! (or a tab); the description, including wrapped continuation lines, is
//! searched for `[default: ...]`.

use std::sync::LazyLock;

use docgram_core::OptionSpec;
use regex::Regex;

use crate::sections::{after_label, parse_section};

static PATTERNS: LazyLock<RegistryPatterns> = LazyLock::new(RegistryPatterns::new);

struct RegistryPatterns {
    column_break: Regex,
    default_value: Regex,
}

impl RegistryPatterns {
    fn new() -> Self {
        // Both patterns are constants; a failure here is a programmer error.
        Self {
            column_break: Regex::new(r"[ \t]{2,}|\t").expect("static regex must compile"),
            default_value: Regex::new(r"(?im)\[default:[ \t]*([^\]\n]*?)[ \t]*(?:\]|$)")
                .expect("static regex must compile"),
        }
    }
}

/// Options known to a grammar, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionRegistry {
    options: Vec<OptionSpec>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the options declared by every "options:" section of `doc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgram_engine::OptionRegistry;
    ///
    /// let doc = "Usage: prog [options]\n\nOptions:\n  -v, --verbose  Talk more.\n  --speed=<kn>   Knots [default: 10].";
    /// let registry = OptionRegistry::from_doc(doc);
    /// assert_eq!(registry.len(), 2);
    /// assert!(registry.get("--verbose").is_some());
    /// assert_eq!(registry.get("--speed").unwrap().default.as_deref(), Some("10"));
    /// ```
    pub fn from_doc(doc: &str) -> Self {
        let mut registry = Self::new();
        for section in parse_section("options:", doc) {
            let body = after_label(&section, "options:").unwrap_or(&section);
            for entry in split_entries(body) {
                registry.register(Self::parse_description(&entry));
            }
        }
        registry
    }

    /// Parses one option entry (declaration plus description).
    ///
    /// # Examples
    ///
    /// ```
    /// use docgram_engine::OptionRegistry;
    ///
    /// let spec = OptionRegistry::parse_description("-p PATH, --path=<path>  Path [default: ./]");
    /// assert_eq!(spec.short.as_deref(), Some("-p"));
    /// assert_eq!(spec.long.as_deref(), Some("--path"));
    /// assert!(spec.takes_value);
    /// assert_eq!(spec.default.as_deref(), Some("./"));
    /// ```
    pub fn parse_description(entry: &str) -> OptionSpec {
        let entry = entry.trim();
        let (first_line, continuation) = match entry.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (entry, None),
        };
        let (declaration, inline_description) = match PATTERNS.column_break.find(first_line) {
            Some(m) => (&first_line[..m.start()], &first_line[m.end()..]),
            None => (first_line, ""),
        };

        let mut spec = OptionSpec::flag(None, None);
        for word in declaration.replace([',', '='], " ").split_whitespace() {
            if word.starts_with("--") {
                spec.long = Some(word.to_string());
            } else if word.starts_with('-') {
                spec.short = Some(word.to_string());
            } else {
                spec.takes_value = true;
            }
        }

        let description = match continuation {
            Some(rest) => format!("{inline_description}\n{rest}"),
            None => inline_description.to_string(),
        };
        spec.default = PATTERNS
            .default_value
            .captures(&description)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        spec
    }

    pub fn register(&mut self, spec: OptionSpec) {
        self.options.push(spec);
    }

    /// Looks an option up by identity key (long form, else short form).
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|spec| spec.name() == name)
    }

    pub fn by_long(&self, long: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|spec| spec.long.as_deref() == Some(long))
            .collect()
    }

    pub fn by_long_prefix(&self, prefix: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|spec| spec.long.as_deref().is_some_and(|l| l.starts_with(prefix)))
            .collect()
    }

    pub fn by_short(&self, short: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|spec| spec.short.as_deref() == Some(short))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionRegistry {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

/// Splits a section body into option entries. An entry starts on a line
/// whose first non-blank characters are `-` and a non-space; other lines
/// continue the current entry.
fn split_entries(body: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in body.lines() {
        let trimmed = line.trim_start();
        let starts_entry = trimmed
            .strip_prefix('-')
            .and_then(|rest| rest.chars().next())
            .is_some_and(|ch| !ch.is_whitespace());
        if starts_entry {
            entries.push(trimmed.to_string());
        } else if let Some(current) = entries.last_mut() {
            current.push('\n');
            current.push_str(line);
        }
    }
    entries
}
