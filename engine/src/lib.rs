//! Usage-text grammar compiler and argv matcher.
//!
//! A doc text with a "Usage:" section (and optionally "Options:" sections)
//! is compiled into a [`Grammar`](docgram_core::Grammar); argument vectors
//! are then matched against it, producing a name → value
//! [`Bindings`](docgram_core::Bindings) map.
//!
//! Pipeline:
//!
//! 1. [`sections`]: locate the usage and options sections.
//! 2. [`registry`]: read option declarations and `[default: ...]` values.
//! 3. [`compiler`]: parse the formal usage expression into a pattern tree.
//! 4. [`fixup`]: unify same-named leaves and type repeated names.
//! 5. [`tokenizer`]: turn argv into tokens using the same option registry.
//! 6. [`matcher`]: backtracking match of the grammar over the tokens.
//! 7. [`assemble`]: bindings, built-in help/version, error messages.
//!
//! # Example
//!
//! ```
//! use docgram_engine::{ParseOptions, UsageParser};
//!
//! let doc = "Naval Fate.
//!
//! Usage:
//!   naval_fate ship <name> move <x> <y> [--speed=<kn>]
//!   naval_fate mine (set|remove) <x> <y> [--moored|--drifting]
//!
//! Options:
//!   --speed=<kn>  Speed in knots [default: 10].
//! ";
//!
//! let parser = UsageParser::new(doc).unwrap();
//! let response = parser.parse(&["mine", "set", "1", "2", "--moored"], &ParseOptions::default());
//! assert!(response.success);
//! assert!(response.bindings.get_bool("set"));
//! assert!(response.bindings.get_bool("--moored"));
//! assert_eq!(response.bindings.get_str("--speed"), Some("10"));
//! ```

pub mod assemble;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fixup;
pub mod flags;
pub mod lexer;
pub mod matcher;
pub mod output;
pub mod registry;
pub mod sections;
pub mod tokenizer;

pub use assemble::{Response, UsageParser, docopt};
pub use config::ParseOptions;
pub use error::{ConfigError, FlagError, GrammarError, UserError};
pub use lexer::ParseMode;
pub use output::{
    GrammarReport, OutputFormat, format_bindings, format_report, format_response, format_responses,
};
pub use registry::OptionRegistry;
