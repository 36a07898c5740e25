//! Token streams shared by the grammar compiler and the argv tokenizer.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

static GROUPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\[\]\(\)\|]|\.\.\.)").expect("static regex must compile")
});

// A word holding a `<...>` placeholder stays whole even if the placeholder
// contains spaces.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*<.*?>|\S+").expect("static regex must compile"));

/// Which side of the engine is consuming a [`TokenStream`].
///
/// The flag resolvers behave differently per side: prefix matching and
/// value binding happen only for live argument vectors, and failures are
/// grammar errors on one side and user errors on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    CompilingGrammar,
    TokenizingArgv,
}

/// A cursor over the words of a usage expression or an argument vector.
#[derive(Debug, Clone)]
pub struct TokenStream {
    words: VecDeque<String>,
    mode: ParseMode,
}

impl TokenStream {
    /// Splits a formal usage expression, isolating `( ) [ ] |` and `...`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgram_engine::lexer::TokenStream;
    ///
    /// let stream = TokenStream::from_pattern("( ship [--speed=<km/h>]... <input file> )");
    /// assert_eq!(
    ///     stream.remaining(),
    ///     vec!["(", "ship", "[", "--speed=<km/h>", "]", "...", "<input file>", ")"]
    /// );
    /// ```
    pub fn from_pattern(source: &str) -> Self {
        let spaced = GROUPING.replace_all(source, " $1 ");
        let words = WORD
            .find_iter(&spaced)
            .map(|m| m.as_str().to_string())
            .collect();
        Self {
            words,
            mode: ParseMode::CompilingGrammar,
        }
    }

    /// Wraps an argument vector; words are taken as given.
    pub fn from_argv<S: AsRef<str>>(argv: &[S]) -> Self {
        Self {
            words: argv.iter().map(|s| s.as_ref().to_string()).collect(),
            mode: ParseMode::TokenizingArgv,
        }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn current(&self) -> Option<&str> {
        self.words.front().map(String::as_str)
    }

    /// Consumes and returns the current word.
    pub fn move_next(&mut self) -> Option<String> {
        self.words.pop_front()
    }

    /// Consumes every remaining word.
    pub fn drain_rest(&mut self) -> Vec<String> {
        self.words.drain(..).collect()
    }

    /// Remaining words, without consuming them.
    pub fn remaining(&self) -> Vec<&str> {
        self.words.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
