//! Pattern fix-up: identity unification and repetition typing.
//!
//! Every declared name gets one [`Slot`]; all leaves with that name point
//! at it. A name that can occur more than once within a single way of
//! matching the grammar (one *case*: a pick of one branch per `Either`,
//! with `...` counted twice) accumulates instead of binding once: a count
//! for commands and flags, a list for arguments and valued options.
//!
//! The per-case maximum is computed bottom-up rather than by expanding
//! every case, since sequences add maxima, alternatives take the largest
//! and repetition doubles.

use std::collections::HashMap;

use docgram_core::{Grammar, Node, OptionSpec, Pattern, Slot, SlotId, SlotKind, Value};
use tracing::debug;

/// Builds the shared-slot [`Grammar`] for a compiled pattern.
///
/// # Examples
///
/// ```
/// use docgram_core::{Pattern, Value};
/// use docgram_engine::fixup::fix;
///
/// // usage: prog go go <x> <x>
/// let pattern = Pattern::Required(vec![
///     Pattern::Command("go".into()),
///     Pattern::Command("go".into()),
///     Pattern::Argument("<x>".into()),
///     Pattern::Argument("<x>".into()),
/// ]);
/// let grammar = fix(&pattern);
/// assert_eq!(grammar.len(), 2);
/// assert_eq!(grammar.slot_by_name("go").unwrap().1.default, Value::Count(0));
/// assert_eq!(grammar.slot_by_name("<x>").unwrap().1.default, Value::List(vec![]));
/// ```
pub fn fix(pattern: &Pattern) -> Grammar {
    let mut builder = SlotTable::default();
    let root = builder.node(pattern);

    let occurrences = max_occurrences(pattern);
    let mut slots = builder.slots;
    for slot in &mut slots {
        if occurrences.get(&slot.name).copied().unwrap_or(0) > 1 {
            slot.default = repeated_default(slot);
        }
    }

    let repeated = slots
        .iter()
        .filter(|slot| matches!(slot.default, Value::Count(_) | Value::List(_)))
        .count();
    debug!(slots = slots.len(), repeated, "fixed up pattern");
    Grammar { root, slots }
}

#[derive(Default)]
struct SlotTable {
    slots: Vec<Slot>,
    index: HashMap<String, SlotId>,
}

impl SlotTable {
    fn intern(&mut self, name: &str, kind: SlotKind, default: Value) -> SlotId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = SlotId(self.slots.len());
        self.slots.push(Slot {
            name: name.to_string(),
            kind,
            default,
        });
        self.index.insert(name.to_string(), id);
        id
    }

    fn option(&mut self, spec: &OptionSpec) -> SlotId {
        self.intern(
            spec.name(),
            SlotKind::Option(spec.clone()),
            spec.initial_value(),
        )
    }

    fn node(&mut self, pattern: &Pattern) -> Node {
        match pattern {
            Pattern::Option(spec) => Node::Option(self.option(spec)),
            Pattern::Argument(name) => {
                Node::Argument(self.intern(name, SlotKind::Argument, Value::Null))
            }
            Pattern::Command(name) => {
                Node::Command(self.intern(name, SlotKind::Command, Value::Bool(false)))
            }
            Pattern::Required(children) => Node::Required(self.nodes(children)),
            Pattern::Optional(children) => Node::Optional(self.nodes(children)),
            Pattern::Either(children) => Node::Either(self.nodes(children)),
            Pattern::Repeatable(child) => Node::Repeatable(Box::new(self.node(child))),
            Pattern::OptionsShortcut(specs) => Node::OptionsShortcut(
                specs
                    .iter()
                    .map(|spec| Node::Option(self.option(spec)))
                    .collect(),
            ),
        }
    }

    fn nodes(&mut self, children: &[Pattern]) -> Vec<Node> {
        children.iter().map(|child| self.node(child)).collect()
    }
}

/// Largest number of times each name occurs within a single case.
fn max_occurrences(pattern: &Pattern) -> HashMap<String, usize> {
    match pattern {
        Pattern::Option(_) | Pattern::Argument(_) | Pattern::Command(_) => {
            let mut counts = HashMap::new();
            if let Some(name) = pattern.name() {
                counts.insert(name.to_string(), 1);
            }
            counts
        }
        Pattern::Required(children) | Pattern::Optional(children) => {
            let mut counts = HashMap::new();
            for child in children {
                for (name, n) in max_occurrences(child) {
                    *counts.entry(name).or_insert(0) += n;
                }
            }
            counts
        }
        Pattern::OptionsShortcut(specs) => {
            let mut counts = HashMap::new();
            for spec in specs {
                *counts.entry(spec.name().to_string()).or_insert(0) += 1;
            }
            counts
        }
        Pattern::Either(children) => {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for child in children {
                for (name, n) in max_occurrences(child) {
                    let entry = counts.entry(name).or_insert(0);
                    *entry = (*entry).max(n);
                }
            }
            counts
        }
        Pattern::Repeatable(child) => max_occurrences(child)
            .into_iter()
            .map(|(name, n)| (name, n * 2))
            .collect(),
    }
}

fn repeated_default(slot: &Slot) -> Value {
    if !slot.collects_values() {
        return Value::Count(0);
    }
    let default = match &slot.kind {
        SlotKind::Option(spec) => spec.default.as_deref(),
        _ => None,
    };
    Value::List(
        default
            .map(|text| text.split_whitespace().map(String::from).collect())
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(name: &str) -> Pattern {
        Pattern::Argument(name.into())
    }

    fn default_of(grammar: &Grammar, name: &str) -> Value {
        grammar.slot_by_name(name).unwrap().1.default.clone()
    }

    #[test]
    fn test_same_name_shares_one_slot() {
        let pattern = Pattern::Required(vec![
            Pattern::Either(vec![arg("N"), Pattern::Command("go".into())]),
            Pattern::Either(vec![Pattern::Command("go".into()), arg("M")]),
        ]);
        let grammar = fix(&pattern);
        let names: Vec<_> = grammar.slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["N", "go", "M"]);
        let Node::Required(children) = &grammar.root else {
            panic!("root must stay Required");
        };
        let Node::Either(first) = &children[0] else {
            panic!("expected Either");
        };
        let Node::Either(second) = &children[1] else {
            panic!("expected Either");
        };
        assert_eq!(first[1].slot(), second[0].slot());
    }

    #[test]
    fn test_alternatives_stay_scalar() {
        // (NAME | --foo NAME)
        let foo = OptionSpec::flag(None, Some("--foo"));
        let pattern = Pattern::Required(vec![Pattern::Either(vec![
            arg("NAME"),
            Pattern::Required(vec![Pattern::Option(foo), arg("NAME")]),
        ])]);
        let grammar = fix(&pattern);
        assert_eq!(default_of(&grammar, "NAME"), Value::Null);
        assert_eq!(default_of(&grammar, "--foo"), Value::Bool(false));
    }

    #[test]
    fn test_repeatable_makes_list_and_count() {
        let v = OptionSpec::flag(Some("-v"), None);
        let pattern = Pattern::Required(vec![
            Pattern::Repeatable(Box::new(arg("<file>"))),
            Pattern::Optional(vec![Pattern::Repeatable(Box::new(Pattern::Option(v)))]),
        ]);
        let grammar = fix(&pattern);
        assert_eq!(default_of(&grammar, "<file>"), Value::List(vec![]));
        assert_eq!(default_of(&grammar, "-v"), Value::Count(0));
    }

    #[test]
    fn test_repeated_option_splits_default() {
        let data = OptionSpec::with_argument(Some("-d"), Some("--data")).with_default("x y");
        let pattern = Pattern::Required(vec![Pattern::Repeatable(Box::new(Pattern::Option(
            data.clone(),
        )))]);
        let grammar = fix(&pattern);
        assert_eq!(
            default_of(&grammar, "--data"),
            Value::List(vec!["x".into(), "y".into()])
        );

        let single = fix(&Pattern::Required(vec![Pattern::Option(data)]));
        assert_eq!(default_of(&single, "--data"), Value::Str("x y".into()));
    }

    #[test]
    fn test_twice_in_one_sequence_counts() {
        let v = OptionSpec::flag(Some("-v"), None);
        let pattern = Pattern::Required(vec![Pattern::Optional(vec![
            Pattern::Option(v.clone()),
            Pattern::Option(v),
        ])]);
        let grammar = fix(&pattern);
        assert_eq!(grammar.len(), 1);
        assert_eq!(default_of(&grammar, "-v"), Value::Count(0));
    }

    #[test]
    fn test_shortcut_options_get_slots() {
        let pattern = Pattern::Required(vec![Pattern::OptionsShortcut(vec![
            OptionSpec::flag(Some("-a"), None),
            OptionSpec::with_argument(None, Some("--speed")).with_default("10"),
        ])]);
        let grammar = fix(&pattern);
        assert_eq!(default_of(&grammar, "-a"), Value::Bool(false));
        assert_eq!(default_of(&grammar, "--speed"), Value::Str("10".into()));
    }
}
