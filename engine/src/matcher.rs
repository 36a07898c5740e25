//! Backtracking matcher of a [`Grammar`] against argv tokens.
//!
//! Matching is a pure function of `(node, state)`; a failed attempt never
//! changes the caller's state, so alternatives can be tried from the same
//! starting point.

use docgram_core::{Accumulation, Grammar, Node, SlotId, SlotKind, Token, Value};
use tracing::debug;

/// Tokens not consumed yet, plus the value bound to each slot so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub leftover: Vec<Token>,
    /// Indexed by [`SlotId`]; `None` while a slot is unbound.
    pub bindings: Vec<Option<Value>>,
}

impl MatchState {
    pub fn new(grammar: &Grammar, tokens: Vec<Token>) -> Self {
        Self {
            leftover: tokens,
            bindings: vec![None; grammar.len()],
        }
    }

    pub fn binding(&self, id: SlotId) -> Option<&Value> {
        self.bindings.get(id.0).and_then(Option::as_ref)
    }
}

/// Result of matching a whole argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Every token was consumed.
    Accepted(MatchState),
    /// `state` is the original input state. `unconsumed` is set when the
    /// grammar itself matched but tokens were left over.
    Rejected {
        state: MatchState,
        unconsumed: Option<Vec<Token>>,
    },
}

impl MatchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MatchOutcome::Accepted(_))
    }
}

/// Matches the grammar's root against `tokens`.
///
/// # Examples
///
/// ```
/// use docgram_core::Token;
/// use docgram_engine::UsageParser;
/// use docgram_engine::matcher::match_tokens;
///
/// let parser = UsageParser::new("usage: prog <x> [-v]").unwrap();
/// let grammar = parser.grammar();
///
/// assert!(match_tokens(grammar, vec![Token::argument("a")]).is_accepted());
/// assert!(!match_tokens(grammar, vec![]).is_accepted());
/// ```
pub fn match_tokens(grammar: &Grammar, tokens: Vec<Token>) -> MatchOutcome {
    let initial = MatchState::new(grammar, tokens);
    let outcome = match try_match(grammar, &grammar.root, &initial) {
        Some(state) if state.leftover.is_empty() => MatchOutcome::Accepted(state),
        Some(state) => MatchOutcome::Rejected {
            state: initial,
            unconsumed: Some(state.leftover),
        },
        None => MatchOutcome::Rejected {
            state: initial,
            unconsumed: None,
        },
    };
    debug!(accepted = outcome.is_accepted(), "matched argv against grammar");
    outcome
}

/// Matches one node. On failure the returned state is `state` unchanged.
pub fn match_node(grammar: &Grammar, node: &Node, state: MatchState) -> (bool, MatchState) {
    match try_match(grammar, node, &state) {
        Some(next) => (true, next),
        None => (false, state),
    }
}

fn try_match(grammar: &Grammar, node: &Node, state: &MatchState) -> Option<MatchState> {
    match node {
        Node::Option(id) | Node::Argument(id) | Node::Command(id) => {
            match_leaf(grammar, *id, state)
        }
        Node::Required(children) => {
            let mut current = state.clone();
            for child in children {
                current = try_match(grammar, child, &current)?;
            }
            Some(current)
        }
        Node::Optional(children) | Node::OptionsShortcut(children) => {
            let mut current = state.clone();
            for child in children {
                if let Some(next) = try_match(grammar, child, &current) {
                    current = next;
                }
            }
            Some(current)
        }
        Node::Either(children) => {
            let mut best: Option<MatchState> = None;
            for child in children {
                if let Some(candidate) = try_match(grammar, child, state) {
                    // strict comparison keeps the earliest alternative on ties
                    let better = best
                        .as_ref()
                        .is_none_or(|b| candidate.leftover.len() < b.leftover.len());
                    if better {
                        best = Some(candidate);
                    }
                }
            }
            best
        }
        Node::Repeatable(child) => {
            let mut current = state.clone();
            let mut times = 0;
            while let Some(next) = try_match(grammar, child, &current) {
                times += 1;
                let consumed = next.leftover.len() < current.leftover.len();
                current = next;
                if !consumed {
                    break;
                }
            }
            (times > 0).then_some(current)
        }
    }
}

fn match_leaf(grammar: &Grammar, id: SlotId, state: &MatchState) -> Option<MatchState> {
    let slot = grammar.slot(id);
    let (position, value) = find_single(&slot.kind, &slot.name, &state.leftover)?;

    let mut next = state.clone();
    next.leftover.remove(position);
    let bound = &mut next.bindings[id.0];
    *bound = Some(match (slot.accumulation(), bound.take()) {
        (Accumulation::Count, Some(Value::Count(n))) => Value::Count(n + 1),
        (Accumulation::Count, _) => Value::Count(1),
        (Accumulation::List, previous) => {
            let mut items = match previous {
                Some(Value::List(items)) => items,
                _ => Vec::new(),
            };
            match value {
                Value::Str(s) => items.push(s),
                Value::List(more) => items.extend(more),
                _ => {}
            }
            Value::List(items)
        }
        (Accumulation::Scalar, Some(previous)) => previous,
        (Accumulation::Scalar, None) => value,
    });
    Some(next)
}

/// Finds the token a leaf would consume and the value it carries.
fn find_single(kind: &SlotKind, name: &str, leftover: &[Token]) -> Option<(usize, Value)> {
    match kind {
        SlotKind::Option(_) => leftover.iter().enumerate().find_map(|(pos, token)| match token {
            Token::Option { name: n, value } if n == name => Some((pos, value.clone())),
            _ => None,
        }),
        SlotKind::Argument => leftover.iter().enumerate().find_map(|(pos, token)| match token {
            Token::Argument(raw) => Some((pos, Value::Str(raw.clone()))),
            _ => None,
        }),
        // only the first positional word may be a command
        SlotKind::Command => {
            let (pos, raw) = leftover
                .iter()
                .enumerate()
                .find_map(|(pos, token)| match token {
                    Token::Argument(raw) => Some((pos, raw)),
                    _ => None,
                })?;
            (raw == name).then_some((pos, Value::Bool(true)))
        }
    }
}
