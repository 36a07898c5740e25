//! Section extraction: "Usage:" and "Options:" blocks of a doc text.

use crate::error::GrammarError;

/// Returns every section introduced by a line containing `label`
/// (case-insensitive).
///
/// A section is the label line plus every directly following line that
/// starts with a space or a tab. Sections do not overlap, and each is
/// returned trimmed.
///
/// # Examples
///
/// ```
/// use docgram_engine::sections::parse_section;
///
/// let doc = "Usage: prog [options]\n\nOptions:\n  -a  All.\n  -b  Both.\n\nmore text";
/// assert_eq!(parse_section("options:", doc), vec!["Options:\n  -a  All.\n  -b  Both."]);
/// assert_eq!(parse_section("usage:", doc), vec!["Usage: prog [options]"]);
/// ```
pub fn parse_section(label: &str, doc: &str) -> Vec<String> {
    let label = label.to_lowercase();
    let lines: Vec<&str> = doc.lines().collect();
    let mut sections = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        if !lines[idx].to_lowercase().contains(&label) {
            idx += 1;
            continue;
        }
        let start = idx;
        idx += 1;
        while idx < lines.len() && lines[idx].starts_with([' ', '\t']) {
            idx += 1;
        }
        sections.push(lines[start..idx].join("\n").trim().to_string());
    }

    sections
}

/// Returns the single "usage:" section of `doc`.
pub fn usage_section(doc: &str) -> Result<String, GrammarError> {
    let mut sections = parse_section("usage:", doc);
    match sections.len() {
        0 => Err(GrammarError::MissingUsage),
        1 => Ok(sections.remove(0)),
        _ => Err(GrammarError::DuplicateUsage),
    }
}

/// Text following the first case-insensitive occurrence of `label`, or
/// `None` when the label is absent.
pub(crate) fn after_label<'a>(section: &'a str, label: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with the original text
    let lowered = section.to_ascii_lowercase();
    lowered
        .find(&label.to_ascii_lowercase())
        .map(|pos| &section[pos + label.len()..])
}

/// Reduces a usage section to one formal expression.
///
/// The first word after the label is the program name. It is dropped, and
/// every later occurrence of it starts a new alternative.
///
/// # Examples
///
/// ```
/// use docgram_engine::sections::formal_usage;
///
/// let section = "Usage: prog ship new <name>...\n       prog mine (set|remove)";
/// assert_eq!(
///     formal_usage(section).unwrap(),
///     "( ship new <name>... ) | ( mine (set|remove) )"
/// );
/// ```
pub fn formal_usage(section: &str) -> Result<String, GrammarError> {
    let body = after_label(section, "usage:").unwrap_or(section);
    let mut words = body.split_whitespace();
    let program = words.next().ok_or(GrammarError::EmptyUsage)?;

    let rest: Vec<&str> = words
        .map(|word| if word == program { ") | (" } else { word })
        .collect();
    if rest.is_empty() {
        return Ok("( )".to_string());
    }
    Ok(format!("( {} )", rest.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_stops_at_unindented_line() {
        let doc = "usage: prog\n  prog <a>\nOptions: -x\nfoo";
        assert_eq!(parse_section("usage:", doc), vec!["usage: prog\n  prog <a>"]);
        assert_eq!(parse_section("options:", doc), vec!["Options: -x"]);
    }

    #[test]
    fn test_section_label_anywhere_in_line() {
        let doc = "Naval Fate usage: fate ship\n";
        assert_eq!(parse_section("usage:", doc), vec!["Naval Fate usage: fate ship"]);
    }

    #[test]
    fn test_repeated_options_sections() {
        let doc = "usage: prog\n\noptions: --foo\n\noptions: --bar\n";
        assert_eq!(
            parse_section("options:", doc),
            vec!["options: --foo", "options: --bar"]
        );
    }

    #[test]
    fn test_usage_section_errors() {
        assert_eq!(
            usage_section("no label here"),
            Err(GrammarError::MissingUsage)
        );
        assert_eq!(
            usage_section("usage: a\n\nusage: b"),
            Err(GrammarError::DuplicateUsage)
        );
        assert_eq!(usage_section("UsAgE: prog").unwrap(), "UsAgE: prog");
    }

    #[test]
    fn test_formal_usage_program_only() {
        assert_eq!(formal_usage("usage: prog").unwrap(), "( )");
        assert_eq!(
            formal_usage("usage: prog\n       prog <a> <b>").unwrap(),
            "( ) | ( <a> <b> )"
        );
    }

    #[test]
    fn test_formal_usage_requires_program() {
        assert_eq!(formal_usage("usage:"), Err(GrammarError::EmptyUsage));
    }
}
