//! Long and short option resolution against an [`OptionRegistry`].
//!
//! The same resolvers serve the grammar compiler and the argv tokenizer;
//! the stream's [`ParseMode`] selects between the two behaviours.

use docgram_core::{OptionSpec, Token, Value};

use crate::error::FlagError;
use crate::lexer::{ParseMode, TokenStream};
use crate::registry::OptionRegistry;

/// One option occurrence resolved from a word of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFlag {
    /// Registry descriptor (or the one registered on the fly).
    pub spec: OptionSpec,
    /// Live value; always [`Value::Null`] while compiling a grammar.
    pub value: Value,
}

impl ResolvedFlag {
    fn new(spec: OptionSpec, mode: ParseMode, value: Option<String>) -> Self {
        let value = match (mode, value) {
            (ParseMode::CompilingGrammar, _) => Value::Null,
            (ParseMode::TokenizingArgv, Some(value)) => Value::Str(value),
            (ParseMode::TokenizingArgv, None) => Value::Bool(true),
        };
        Self { spec, value }
    }

    pub fn into_token(self) -> Token {
        Token::Option {
            name: self.spec.name().to_string(),
            value: self.value,
        }
    }
}

/// Resolves the current word, `--name` or `--name=value`.
///
/// Exact matches win. Live argument vectors may abbreviate a long option to
/// any unique prefix. An unknown option is registered on the fly, with
/// arity 1 when written with `=`.
///
/// # Examples
///
/// ```
/// use docgram_core::{OptionSpec, Value};
/// use docgram_engine::OptionRegistry;
/// use docgram_engine::flags::parse_long;
/// use docgram_engine::lexer::TokenStream;
///
/// let mut registry = OptionRegistry::new();
/// registry.register(OptionSpec::with_argument(None, Some("--speed")));
///
/// let mut stream = TokenStream::from_argv(&["--sp", "15"]);
/// let flags = parse_long(&mut stream, &mut registry).unwrap();
/// assert_eq!(flags[0].spec.name(), "--speed");
/// assert_eq!(flags[0].value, Value::Str("15".into()));
/// assert!(stream.is_empty());
/// ```
pub fn parse_long(
    stream: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Vec<ResolvedFlag>, FlagError> {
    let mode = stream.mode();
    let word = stream.move_next().unwrap_or_default();
    let (long, mut value) = match word.split_once('=') {
        Some((long, value)) => (long.to_string(), Some(value.to_string())),
        None => (word.clone(), None),
    };

    let mut similar = registry.by_long(&long);
    if similar.len() > 1 {
        return Err(FlagError::AmbiguousLong {
            flag: long,
            count: similar.len(),
        });
    }
    if mode == ParseMode::TokenizingArgv && similar.is_empty() {
        similar = registry.by_long_prefix(&long);
    }
    let mut similar: Vec<OptionSpec> = similar.into_iter().cloned().collect();

    if similar.len() > 1 {
        let candidates = similar
            .iter()
            .filter_map(|spec| spec.long.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(FlagError::NotUniquePrefix {
            flag: long,
            candidates,
        });
    }

    let Some(spec) = similar.pop() else {
        let spec = if value.is_some() {
            OptionSpec::with_argument(None, Some(&long))
        } else {
            OptionSpec::flag(None, Some(&long))
        };
        registry.register(spec.clone());
        return Ok(vec![ResolvedFlag::new(spec, mode, value)]);
    };

    if !spec.takes_value {
        if value.is_some() {
            return Err(FlagError::UnexpectedArgument(spec.name().to_string()));
        }
    } else if value.is_none() {
        value = Some(take_argument(stream, spec.name())?);
    }
    Ok(vec![ResolvedFlag::new(spec, mode, value)])
}

/// Resolves the current word as a cluster of short options (`-abc`).
///
/// An option of arity 1 takes the rest of the cluster as its value, or the
/// next word when the cluster is exhausted, and ends the cluster.
///
/// # Examples
///
/// ```
/// use docgram_core::{OptionSpec, Value};
/// use docgram_engine::OptionRegistry;
/// use docgram_engine::flags::parse_shorts;
/// use docgram_engine::lexer::TokenStream;
///
/// let mut registry = OptionRegistry::new();
/// registry.register(OptionSpec::flag(Some("-a"), None));
/// registry.register(OptionSpec::with_argument(Some("-o"), Some("--output")));
///
/// let mut stream = TokenStream::from_argv(&["-aofile.txt"]);
/// let flags = parse_shorts(&mut stream, &mut registry).unwrap();
/// assert_eq!(flags.len(), 2);
/// assert_eq!(flags[1].spec.name(), "--output");
/// assert_eq!(flags[1].value, Value::Str("file.txt".into()));
/// ```
pub fn parse_shorts(
    stream: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Vec<ResolvedFlag>, FlagError> {
    let mode = stream.mode();
    let word = stream.move_next().unwrap_or_default();
    let mut left = word.trim_start_matches('-');
    let mut parsed = Vec::new();

    while let Some(ch) = left.chars().next() {
        let short = format!("-{ch}");
        left = &left[ch.len_utf8()..];

        let mut similar: Vec<OptionSpec> =
            registry.by_short(&short).into_iter().cloned().collect();
        if similar.len() > 1 {
            return Err(FlagError::AmbiguousShort {
                flag: short,
                count: similar.len(),
            });
        }

        let Some(spec) = similar.pop() else {
            let spec = OptionSpec::flag(Some(&short), None);
            registry.register(spec.clone());
            parsed.push(ResolvedFlag::new(spec, mode, None));
            continue;
        };

        let mut value = None;
        if spec.takes_value {
            if left.is_empty() {
                value = Some(take_argument(stream, &short)?);
            } else {
                value = Some(left.to_string());
                left = "";
            }
        }
        parsed.push(ResolvedFlag::new(spec, mode, value));
    }

    Ok(parsed)
}

fn take_argument(stream: &mut TokenStream, flag: &str) -> Result<String, FlagError> {
    match stream.current() {
        None | Some("--") => Err(FlagError::MissingArgument(flag.to_string())),
        Some(_) => Ok(stream.move_next().unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(specs: &[OptionSpec]) -> OptionRegistry {
        let mut registry = OptionRegistry::new();
        for spec in specs {
            registry.register(spec.clone());
        }
        registry
    }

    #[test]
    fn test_long_exact_match_beats_prefix() {
        let mut reg = registry(&[
            OptionSpec::flag(None, Some("--ver")),
            OptionSpec::flag(None, Some("--verbose")),
        ]);
        let mut stream = TokenStream::from_argv(&["--ver"]);
        let flags = parse_long(&mut stream, &mut reg).unwrap();
        assert_eq!(flags[0].spec.name(), "--ver");
        assert_eq!(flags[0].value, Value::Bool(true));
    }

    #[test]
    fn test_long_ambiguous_prefix() {
        let mut reg = registry(&[
            OptionSpec::flag(None, Some("--version")),
            OptionSpec::flag(None, Some("--verbose")),
        ]);
        let mut stream = TokenStream::from_argv(&["--ver"]);
        let err = parse_long(&mut stream, &mut reg).unwrap_err();
        assert_eq!(
            err.to_string(),
            "--ver is not a unique prefix: --version, --verbose?"
        );
    }

    #[test]
    fn test_long_declared_twice_is_not_a_prefix_error() {
        let mut reg = registry(&[
            OptionSpec::flag(Some("-q"), Some("--quiet")),
            OptionSpec::flag(None, Some("--quiet")),
        ]);
        for mut stream in [
            TokenStream::from_argv(&["--quiet"]),
            TokenStream::from_pattern("--quiet"),
        ] {
            let err = parse_long(&mut stream, &mut reg).unwrap_err();
            assert_eq!(
                err,
                FlagError::AmbiguousLong {
                    flag: "--quiet".into(),
                    count: 2
                }
            );
            assert_eq!(err.to_string(), "--quiet is specified ambiguously 2 times");
        }
    }

    #[test]
    fn test_long_prefix_not_used_while_compiling() {
        let mut reg = registry(&[OptionSpec::flag(None, Some("--verbose"))]);
        let mut stream = TokenStream::from_pattern("--verb");
        let flags = parse_long(&mut stream, &mut reg).unwrap();
        assert_eq!(flags[0].spec.name(), "--verb");
        assert_eq!(flags[0].value, Value::Null);
        // the unknown option is now registered
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_long_unknown_with_value_registers_arity_one() {
        let mut reg = OptionRegistry::new();
        let mut stream = TokenStream::from_argv(&["--color=never"]);
        let flags = parse_long(&mut stream, &mut reg).unwrap();
        assert_eq!(flags[0].value, Value::Str("never".into()));
        assert!(reg.get("--color").unwrap().takes_value);
    }

    #[test]
    fn test_long_arity_errors() {
        let mut reg = registry(&[
            OptionSpec::flag(None, Some("--quiet")),
            OptionSpec::with_argument(None, Some("--file")),
        ]);

        let mut stream = TokenStream::from_argv(&["--quiet=yes"]);
        assert_eq!(
            parse_long(&mut stream, &mut reg),
            Err(FlagError::UnexpectedArgument("--quiet".into()))
        );

        let mut stream = TokenStream::from_argv(&["--file"]);
        assert_eq!(
            parse_long(&mut stream, &mut reg),
            Err(FlagError::MissingArgument("--file".into()))
        );

        let mut stream = TokenStream::from_argv(&["--file", "--"]);
        assert_eq!(
            parse_long(&mut stream, &mut reg),
            Err(FlagError::MissingArgument("--file".into()))
        );
    }

    #[test]
    fn test_long_consumes_placeholder_while_compiling() {
        let mut reg = registry(&[OptionSpec::with_argument(None, Some("--speed"))]);
        let mut stream = TokenStream::from_pattern("--speed <kn> ship");
        let flags = parse_long(&mut stream, &mut reg).unwrap();
        assert_eq!(flags[0].spec.name(), "--speed");
        assert_eq!(stream.current(), Some("ship"));
    }

    #[test]
    fn test_shorts_cluster_and_value() {
        let mut reg = registry(&[
            OptionSpec::flag(Some("-a"), None),
            OptionSpec::with_argument(Some("-p"), None),
        ]);
        let mut stream = TokenStream::from_argv(&["-ap", "home/", "rest"]);
        let flags = parse_shorts(&mut stream, &mut reg).unwrap();
        let tokens: Vec<Token> = flags.into_iter().map(ResolvedFlag::into_token).collect();
        assert_eq!(tokens, vec![Token::flag("-a"), Token::option("-p", "home/")]);
        assert_eq!(stream.current(), Some("rest"));
    }

    #[test]
    fn test_shorts_unknown_registers_flag() {
        let mut reg = OptionRegistry::new();
        let mut stream = TokenStream::from_argv(&["-xy"]);
        let flags = parse_shorts(&mut stream, &mut reg).unwrap();
        assert_eq!(flags.len(), 2);
        assert!(!reg.get("-y").unwrap().takes_value);
    }

    #[test]
    fn test_shorts_ambiguous_and_missing() {
        let mut reg = registry(&[
            OptionSpec::flag(Some("-x"), Some("--ex")),
            OptionSpec::flag(Some("-x"), Some("--why")),
            OptionSpec::with_argument(Some("-o"), None),
        ]);
        let mut stream = TokenStream::from_argv(&["-x"]);
        assert_eq!(
            parse_shorts(&mut stream, &mut reg),
            Err(FlagError::AmbiguousShort {
                flag: "-x".into(),
                count: 2
            })
        );

        let mut stream = TokenStream::from_argv(&["-o"]);
        assert_eq!(
            parse_shorts(&mut stream, &mut reg),
            Err(FlagError::MissingArgument("-o".into()))
        );
    }
}
