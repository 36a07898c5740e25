//! Compiled usage pattern tree.
//!
//! A [`Pattern`] is what the grammar compiler produces from a usage text:
//! leaves carry their own declaration data and nothing is shared yet. The
//! fix-up pass turns it into a [`Grammar`](crate::Grammar).

use std::fmt;

use crate::OptionSpec;

/// A node of a compiled usage pattern.
///
/// # Examples
///
/// ```
/// use docgram_core::{OptionSpec, Pattern};
///
/// let pattern = Pattern::Required(vec![
///     Pattern::Command("ship".into()),
///     Pattern::Optional(vec![Pattern::Option(OptionSpec::flag(Some("-f"), None))]),
///     Pattern::Repeatable(Box::new(Pattern::Argument("<name>".into()))),
/// ]);
/// assert_eq!(pattern.to_string(), "( ship [ -f ] <name>... )");
/// assert_eq!(pattern.leaf_names(), vec!["ship", "-f", "<name>"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `-x`, `--xyz`, `--xyz=<v>`
    Option(OptionSpec),
    /// `<name>` or `NAME`
    Argument(String),
    /// Any other literal word
    Command(String),
    /// `( ... )`: every child, in order
    Required(Vec<Pattern>),
    /// `[ ... ]`: every child that can match
    Optional(Vec<Pattern>),
    /// `a | b`: the best matching child
    Either(Vec<Pattern>),
    /// `x...`: one or more of the child
    Repeatable(Box<Pattern>),
    /// `[options]`: every declared option not mentioned elsewhere
    OptionsShortcut(Vec<OptionSpec>),
}

impl Pattern {
    /// Declared name of a leaf; `None` for branch nodes.
    pub fn name(&self) -> Option<&str> {
        match self {
            Pattern::Option(spec) => Some(spec.name()),
            Pattern::Argument(name) | Pattern::Command(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Pattern::Option(_) | Pattern::Argument(_) | Pattern::Command(_)
        )
    }

    /// Visits every node depth-first, parents before children.
    ///
    /// Options held by a resolved shortcut are not separate `Pattern`
    /// nodes; use [`leaf_names`](Pattern::leaf_names) to include them.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Pattern)) {
        visit(self);
        match self {
            Pattern::Required(children)
            | Pattern::Optional(children)
            | Pattern::Either(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
            Pattern::Repeatable(child) => child.walk(visit),
            _ => {}
        }
    }

    /// Option descriptors referenced directly by `Option` leaves.
    pub fn referenced_options(&self) -> Vec<&OptionSpec> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Pattern::Option(spec) = node {
                out.push(spec);
            }
        });
        out
    }

    /// Names of every leaf in declaration order, duplicates included.
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |node| match node {
            Pattern::OptionsShortcut(specs) => out.extend(specs.iter().map(OptionSpec::name)),
            leaf => out.extend(leaf.name()),
        });
        out
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, children: &[Pattern], sep: &str) -> fmt::Result {
    for (idx, child) in children.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }
    Ok(())
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Option(spec) => {
                f.write_str(spec.name())?;
                if spec.takes_value {
                    f.write_str("=<arg>")?;
                }
                Ok(())
            }
            Pattern::Argument(name) | Pattern::Command(name) => f.write_str(name),
            Pattern::Required(children) => {
                f.write_str("( ")?;
                write_children(f, children, " ")?;
                f.write_str(" )")
            }
            Pattern::Optional(children) => {
                f.write_str("[ ")?;
                write_children(f, children, " ")?;
                f.write_str(" ]")
            }
            Pattern::Either(children) => {
                f.write_str("( ")?;
                write_children(f, children, " | ")?;
                f.write_str(" )")
            }
            Pattern::Repeatable(child) => write!(f, "{child}..."),
            Pattern::OptionsShortcut(_) => f.write_str("[options]"),
        }
    }
}
