//! Fixed-up grammar: an immutable node tree over a name-keyed slot table.
//!
//! Leaves of a [`Grammar`] do not hold values. Each leaf points at a
//! [`Slot`] by index, and every leaf sharing a declared name points at the
//! same slot, so repeated occurrences accumulate into one binding. Live
//! values are kept by the matcher in a per-invocation table indexed by
//! [`SlotId`], which is why a single `Grammar` can be shared across threads.

use std::fmt;

use crate::{OptionSpec, Value};

/// Index of a slot in [`Grammar::slots`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// What kind of leaf declared a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    Option(OptionSpec),
    Argument,
    Command,
}

/// How repeated matches of one slot combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// First binding wins.
    Scalar,
    /// Each match increments a counter.
    Count,
    /// Each match appends its value.
    List,
}

/// One declared name of the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    pub kind: SlotKind,
    /// Value reported when nothing was bound; its shape also selects the
    /// [`Accumulation`] rule.
    pub default: Value,
}

impl Slot {
    pub fn accumulation(&self) -> Accumulation {
        match self.default {
            Value::Count(_) => Accumulation::Count,
            Value::List(_) => Accumulation::List,
            _ => Accumulation::Scalar,
        }
    }

    /// Whether this slot may be switched to list accumulation (as opposed
    /// to counting) when its name repeats.
    pub fn collects_values(&self) -> bool {
        match &self.kind {
            SlotKind::Argument => true,
            SlotKind::Option(spec) => spec.takes_value,
            SlotKind::Command => false,
        }
    }
}

/// A node of a fixed-up grammar. Mirrors [`Pattern`](crate::Pattern) with
/// leaves replaced by slot references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Option(SlotId),
    Argument(SlotId),
    Command(SlotId),
    Required(Vec<Node>),
    Optional(Vec<Node>),
    Either(Vec<Node>),
    Repeatable(Box<Node>),
    OptionsShortcut(Vec<Node>),
}

impl Node {
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            Node::Option(id) | Node::Argument(id) | Node::Command(id) => Some(*id),
            _ => None,
        }
    }
}

/// A compiled, fixed-up usage grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub root: Node,
    pub slots: Vec<Slot>,
}

impl Grammar {
    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }

    pub fn slot_by_name(&self, name: &str) -> Option<(SlotId, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.name == name)
            .map(|(idx, slot)| (SlotId(idx), slot))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, &self.root)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, grammar: &Grammar, node: &Node) -> fmt::Result {
    let (open, sep, close, children) = match node {
        Node::Option(id) | Node::Argument(id) | Node::Command(id) => {
            return f.write_str(&grammar.slot(*id).name);
        }
        Node::Repeatable(child) => {
            write_node(f, grammar, child)?;
            return f.write_str("...");
        }
        Node::Required(children) => ("( ", " ", " )", children),
        Node::Optional(children) | Node::OptionsShortcut(children) => ("[ ", " ", " ]", children),
        Node::Either(children) => ("( ", " | ", " )", children),
    };
    f.write_str(open)?;
    for (idx, child) in children.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write_node(f, grammar, child)?;
    }
    f.write_str(close)
}
