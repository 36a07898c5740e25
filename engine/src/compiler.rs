//! Usage grammar compiler: formal usage expression to [`Pattern`] tree.
//!
//! ```text
//! expr     ::= sequence ('|' sequence)*
//! sequence ::= (atom '...'?)*
//! atom     ::= '(' expr ')' | '[' expr ']' | 'options'
//!            | long-option | short-option-cluster
//!            | '<name>' | ALLCAPS | literal
//! ```

use docgram_core::{OptionSpec, Pattern};
use tracing::debug;

use crate::error::GrammarError;
use crate::flags::{ResolvedFlag, parse_long, parse_shorts};
use crate::lexer::TokenStream;
use crate::registry::OptionRegistry;

/// Compiles a formal usage expression into a pattern rooted at `Required`.
///
/// Options met in the expression but not in `registry` are registered into
/// it. `[options]` shortcuts are left empty; see [`resolve_shortcuts`].
///
/// # Examples
///
/// ```
/// use docgram_engine::OptionRegistry;
/// use docgram_engine::compiler::compile_pattern;
///
/// let mut registry = OptionRegistry::new();
/// let pattern = compile_pattern("( ship <name>... [-f] ) | ( stop )", &mut registry).unwrap();
/// assert_eq!(pattern.to_string(), "( ( ( ship <name>... [ -f ] ) | ( stop ) ) )");
/// assert!(registry.get("-f").is_some());
/// ```
pub fn compile_pattern(
    formal: &str,
    registry: &mut OptionRegistry,
) -> Result<Pattern, GrammarError> {
    let mut stream = TokenStream::from_pattern(formal);
    let result = parse_expr(&mut stream, registry)?;
    if !stream.is_empty() {
        return Err(GrammarError::UnexpectedEnding(stream.remaining().join(" ")));
    }
    Ok(Pattern::Required(result))
}

/// Fills every `[options]` shortcut with the declared options that no
/// `Option` leaf of the pattern names.
pub fn resolve_shortcuts(pattern: Pattern, declared: &OptionRegistry) -> Pattern {
    let referenced: Vec<String> = pattern
        .referenced_options()
        .into_iter()
        .map(|spec| spec.name().to_string())
        .collect();

    let mut unreferenced: Vec<OptionSpec> = Vec::new();
    for spec in declared {
        let name = spec.name();
        let seen = unreferenced.iter().any(|s| s.name() == name);
        if !seen && !referenced.iter().any(|r| r == name) {
            unreferenced.push(spec.clone());
        }
    }
    debug!(
        referenced = referenced.len(),
        shortcut = unreferenced.len(),
        "resolved options shortcut"
    );

    fill_shortcuts(pattern, &unreferenced)
}

fn fill_shortcuts(pattern: Pattern, options: &[OptionSpec]) -> Pattern {
    let fill_all = |children: Vec<Pattern>| -> Vec<Pattern> {
        children
            .into_iter()
            .map(|child| fill_shortcuts(child, options))
            .collect()
    };
    match pattern {
        Pattern::OptionsShortcut(_) => Pattern::OptionsShortcut(options.to_vec()),
        Pattern::Required(children) => Pattern::Required(fill_all(children)),
        Pattern::Optional(children) => Pattern::Optional(fill_all(children)),
        Pattern::Either(children) => Pattern::Either(fill_all(children)),
        Pattern::Repeatable(child) => {
            Pattern::Repeatable(Box::new(fill_shortcuts(*child, options)))
        }
        leaf => leaf,
    }
}

fn parse_expr(
    stream: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Vec<Pattern>, GrammarError> {
    let seq = parse_seq(stream, registry)?;
    if stream.current() != Some("|") {
        return Ok(seq);
    }

    let mut alternatives = Vec::new();
    push_alternative(&mut alternatives, seq);
    while stream.current() == Some("|") {
        stream.move_next();
        let seq = parse_seq(stream, registry)?;
        push_alternative(&mut alternatives, seq);
    }

    if alternatives.len() > 1 {
        Ok(vec![Pattern::Either(alternatives)])
    } else {
        Ok(alternatives)
    }
}

fn push_alternative(alternatives: &mut Vec<Pattern>, mut seq: Vec<Pattern>) {
    if seq.len() > 1 {
        alternatives.push(Pattern::Required(seq));
    } else {
        alternatives.append(&mut seq);
    }
}

fn parse_seq(
    stream: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Vec<Pattern>, GrammarError> {
    let mut result = Vec::new();
    while let Some(current) = stream.current() {
        if matches!(current, "]" | ")" | "|") {
            break;
        }
        let mut atom = parse_atom(stream, registry)?;
        if stream.current() == Some("...") {
            stream.move_next();
            let child = if atom.len() == 1 {
                atom.remove(0)
            } else {
                Pattern::Required(atom)
            };
            atom = vec![Pattern::Repeatable(Box::new(child))];
        }
        result.extend(atom);
    }
    Ok(result)
}

fn parse_atom(
    stream: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Vec<Pattern>, GrammarError> {
    let Some(token) = stream.current().map(str::to_string) else {
        return Ok(Vec::new());
    };

    match token.as_str() {
        "(" | "[" => {
            stream.move_next();
            let inner = parse_expr(stream, registry)?;
            let (closing, group) = if token == "(" {
                (")", Pattern::Required(inner))
            } else {
                ("]", Pattern::Optional(inner))
            };
            if stream.move_next().as_deref() != Some(closing) {
                return Err(GrammarError::Unmatched(token.clone()));
            }
            Ok(vec![group])
        }
        "options" => {
            stream.move_next();
            Ok(vec![Pattern::OptionsShortcut(Vec::new())])
        }
        t if t.starts_with("--") && t != "--" => Ok(as_options(parse_long(stream, registry)?)),
        t if t.starts_with('-') && t != "-" && t != "--" => {
            Ok(as_options(parse_shorts(stream, registry)?))
        }
        t if is_argument_name(t) => {
            stream.move_next();
            Ok(vec![Pattern::Argument(token.clone())])
        }
        _ => {
            stream.move_next();
            Ok(vec![Pattern::Command(token.clone())])
        }
    }
}

fn as_options(flags: Vec<ResolvedFlag>) -> Vec<Pattern> {
    flags
        .into_iter()
        .map(|flag| Pattern::Option(flag.spec))
        .collect()
}

/// `<name>`, or a word with at least one uppercase letter and no lowercase
/// letters (`FILE`, `X2`).
fn is_argument_name(token: &str) -> bool {
    (token.starts_with('<') && token.ends_with('>'))
        || (token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase))
}
