//! Core data model for docopt-style usage grammars.
//!
//! This crate defines the types shared by the grammar compiler, the argv
//! tokenizer and the matching engine in `docgram-engine`:
//!
//! - [`OptionSpec`]: an option descriptor (short/long form, arity,
//!   `[default: ...]` text).
//! - [`Value`]: a bound value: null, bool, count, string or string list.
//! - [`Token`]: one element of a tokenized argument vector.
//! - [`Pattern`]: the compiled usage tree, one variant per grammar
//!   construct.
//! - [`Grammar`]: the fixed-up tree whose leaves point into a shared
//!   [`Slot`] table.
//! - [`Bindings`]: the name → value mapping handed back to callers.
//!
//! # Example
//!
//! ```
//! use docgram_core::*;
//!
//! // usage: prog [-v] <file>
//! let pattern = Pattern::Required(vec![
//!     Pattern::Optional(vec![Pattern::Option(OptionSpec::flag(Some("-v"), None))]),
//!     Pattern::Argument("<file>".into()),
//! ]);
//! assert_eq!(pattern.to_string(), "( [ -v ] <file> )");
//!
//! let mut bindings = Bindings::new();
//! bindings.insert("-v", Value::Bool(true));
//! bindings.insert("<file>", Value::Str("notes.txt".into()));
//! assert!(bindings.get_bool("-v"));
//! assert_eq!(bindings.get_str("<file>"), Some("notes.txt"));
//! ```

mod bindings;
mod grammar;
mod pattern;
mod types;

pub use bindings::Bindings;
pub use grammar::{Accumulation, Grammar, Node, Slot, SlotId, SlotKind};
pub use pattern::Pattern;
pub use types::*;
