//! Compiled parsers and the response of one invocation.

use docgram_core::{Bindings, Grammar, Pattern, Token, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compiler::{compile_pattern, resolve_shortcuts};
use crate::config::ParseOptions;
use crate::error::{GrammarError, UserError};
use crate::fixup::fix;
use crate::matcher::{MatchOutcome, match_tokens};
use crate::registry::OptionRegistry;
use crate::sections::{formal_usage, usage_section};
use crate::tokenizer::tokenize_argv;

/// A doc text compiled once and matched any number of times.
///
/// Immutable after construction; every [`parse`](UsageParser::parse) works
/// on its own copies, so one parser may serve many threads.
///
/// # Examples
///
/// ```
/// use docgram_engine::{ParseOptions, UsageParser};
///
/// let parser = UsageParser::new("Usage: prog [-v] <file>...").unwrap();
/// let response = parser.parse(&["a.txt", "-v", "b.txt"], &ParseOptions::default());
/// assert!(response.success);
/// assert!(response.bindings.get_bool("-v"));
/// assert_eq!(response.bindings.get_list("<file>"), vec!["a.txt", "b.txt"]);
/// ```
#[derive(Debug, Clone)]
pub struct UsageParser {
    doc: String,
    usage: String,
    formal_usage: String,
    pattern: Pattern,
    grammar: Grammar,
    registry: OptionRegistry,
}

impl UsageParser {
    /// Compiles `doc`.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] when the doc has no usage section, more
    /// than one, or a usage expression that does not parse.
    pub fn new(doc: &str) -> Result<Self, GrammarError> {
        let usage = usage_section(doc)?;
        let formal_usage = formal_usage(&usage)?;
        let declared = OptionRegistry::from_doc(doc);

        let mut registry = declared.clone();
        let pattern = compile_pattern(&formal_usage, &mut registry)?;
        let pattern = resolve_shortcuts(pattern, &declared);
        let grammar = fix(&pattern);
        debug!(
            formal = %formal_usage,
            declared = declared.len(),
            slots = grammar.len(),
            "compiled usage grammar"
        );

        Ok(Self {
            doc: doc.to_string(),
            usage,
            formal_usage,
            pattern,
            grammar,
            registry,
        })
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// The "usage:" section, trimmed.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn formal_usage(&self) -> &str {
        &self.formal_usage
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Declared options plus those first seen in the usage section.
    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Matches one argument vector (without the program name).
    ///
    /// Never exits the process; see [`Response::exit_if_done`].
    pub fn parse<S: AsRef<str>>(&self, argv: &[S], options: &ParseOptions) -> Response {
        let mut registry = self.registry.clone();
        let tokenized = tokenize_argv(argv, &mut registry, options.options_first);

        if options.help && has_flag(&tokenized.tokens, &["-h", "--help"]) {
            return Response::printed(self.usage_text(options));
        }
        if let Some(version) = &options.version {
            if has_flag(&tokenized.tokens, &["--version"]) {
                return Response::printed(version);
            }
        }

        match match_tokens(&self.grammar, tokenized.tokens) {
            MatchOutcome::Accepted(state) => {
                let bindings = self
                    .grammar
                    .slots
                    .iter()
                    .zip(state.bindings)
                    .map(|(slot, bound)| {
                        let value = bound.unwrap_or_else(|| slot.default.clone());
                        (slot.name.clone(), value)
                    })
                    .collect();
                Response::matched(bindings)
            }
            MatchOutcome::Rejected { unconsumed, .. } => {
                let error = match (tokenized.errors.into_iter().next(), unconsumed) {
                    (Some(flag_error), _) => UserError::Flag(flag_error),
                    (None, Some(leftover)) => UserError::UnexpectedArguments(
                        leftover
                            .iter()
                            .map(Token::to_string)
                            .collect::<Vec<_>>()
                            .join(" "),
                    ),
                    (None, None) => UserError::NoMatch,
                };
                debug!(%error, "argv rejected");
                Response::failed(format!("{error}\n{}", self.usage_text(options)))
            }
        }
    }

    /// Text shown with help output and errors: the usage section, or the
    /// whole doc with `exit_full_usage`.
    fn usage_text(&self, options: &ParseOptions) -> &str {
        if options.exit_full_usage {
            self.doc.trim()
        } else {
            &self.usage
        }
    }
}

fn has_flag(tokens: &[Token], names: &[&str]) -> bool {
    tokens.iter().any(|token| match token {
        Token::Option { name, value } => names.contains(&name.as_str()) && value.is_truthy(),
        _ => false,
    })
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// `true` for a match and for help/version output.
    pub success: bool,
    pub bindings: Bindings,
    /// Process status to exit with: 0 on success, 1 on failure.
    pub error_status: i32,
    pub error_message: Option<String>,
    /// Help or version text, when requested.
    pub output: Option<String>,
}

impl Response {
    fn matched(bindings: Bindings) -> Self {
        Self {
            success: true,
            bindings,
            error_status: 0,
            error_message: None,
            output: None,
        }
    }

    fn printed(text: &str) -> Self {
        Self {
            output: Some(text.to_string()),
            ..Self::matched(Bindings::new())
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            bindings: Bindings::new(),
            error_status: 1,
            error_message: Some(message),
            output: None,
        }
    }

    /// Looks up a bound value by declared name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Terminates the process when the invocation is finished: failures
    /// print the message to stderr and exit with the error status;
    /// help/version output goes to stdout and exits 0. Plain successes
    /// return.
    pub fn exit_if_done(&self) {
        if !self.success {
            if let Some(message) = &self.error_message {
                eprintln!("{message}");
            }
            std::process::exit(self.error_status);
        }
        if let Some(output) = &self.output {
            println!("{output}");
            std::process::exit(0);
        }
    }
}

/// Compiles `doc` and matches `argv`, defaulting to the process arguments
/// without the program name.
///
/// With `options.exit` set, a failed match or a help/version request ends
/// the process.
///
/// # Examples
///
/// ```
/// use docgram_engine::{ParseOptions, docopt};
///
/// let doc = "Usage: prog [--speed=<kn>]\n\nOptions:\n  --speed=<kn>  Speed [default: 10].";
/// let options = ParseOptions::default().with_exit(false);
/// let response = docopt(doc, Some(vec![]), &options).unwrap();
/// assert_eq!(response.bindings.get_str("--speed"), Some("10"));
/// ```
pub fn docopt(
    doc: &str,
    argv: Option<Vec<String>>,
    options: &ParseOptions,
) -> Result<Response, GrammarError> {
    let parser = UsageParser::new(doc)?;
    let argv = argv.unwrap_or_else(|| std::env::args().skip(1).collect());
    let response = parser.parse(&argv, options);
    if options.exit {
        response.exit_if_done();
    }
    Ok(response)
}
