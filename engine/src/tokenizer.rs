//! Argument vector tokenizer.

use docgram_core::Token;
use tracing::trace;

use crate::error::FlagError;
use crate::flags::{ResolvedFlag, parse_long, parse_shorts};
use crate::lexer::TokenStream;
use crate::registry::OptionRegistry;

/// Tokens of one argument vector plus the option failures met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    /// Failures in order of occurrence. Each left a [`Token::Invalid`]
    /// in `tokens`.
    pub errors: Vec<FlagError>,
}

/// Turns `argv` into tokens, resolving options against `registry`.
///
/// Unknown options are registered into `registry`, so callers pass a
/// per-invocation copy. Option failures do not stop tokenization: the
/// offending word becomes [`Token::Invalid`] and the error is recorded.
///
/// # Examples
///
/// ```
/// use docgram_core::{OptionSpec, Token};
/// use docgram_engine::OptionRegistry;
/// use docgram_engine::tokenizer::tokenize_argv;
///
/// let mut registry = OptionRegistry::new();
/// registry.register(OptionSpec::with_argument(Some("-o"), None));
///
/// let tokenized = tokenize_argv(&["-o", "out", "--", "-x"], &mut registry, false);
/// assert_eq!(
///     tokenized.tokens,
///     vec![
///         Token::option("-o", "out"),
///         Token::argument("--"),
///         Token::argument("-x"),
///     ]
/// );
/// assert!(tokenized.errors.is_empty());
/// ```
pub fn tokenize_argv<S: AsRef<str>>(
    argv: &[S],
    registry: &mut OptionRegistry,
    options_first: bool,
) -> Tokenized {
    let mut stream = TokenStream::from_argv(argv);
    let mut out = Tokenized::default();

    while let Some(current) = stream.current() {
        let current = current.to_string();
        if current == "--" {
            break;
        }

        let resolved = if current.starts_with("--") {
            parse_long(&mut stream, registry)
        } else if current.starts_with('-') && current != "-" {
            parse_shorts(&mut stream, registry)
        } else if options_first {
            break;
        } else {
            stream.move_next();
            out.tokens.push(Token::Argument(current));
            continue;
        };

        match resolved {
            Ok(flags) => out
                .tokens
                .extend(flags.into_iter().map(ResolvedFlag::into_token)),
            Err(err) => {
                trace!(word = %current, error = %err, "deferred option error");
                out.tokens.push(Token::Invalid(current));
                out.errors.push(err);
            }
        }
    }

    out.tokens
        .extend(stream.drain_rest().into_iter().map(Token::Argument));
    out
}
