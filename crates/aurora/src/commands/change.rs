use itertools::Itertools;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::fmt::Display;

#[derive(Debug, Eq, PartialEq)]
pub enum Change {
    Added(String),
    Removed(String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, Vec<Change>),
}

impl Change {
    /// Push `change` onto a modification, creating it on first use
    pub fn record(slot: &mut Option<Change>, name: &str, change: Change) {
        if let Change::Modified(_, children) =
            slot.get_or_insert_with(|| Change::Modified(name.to_owned(), Vec::new()))
        {
            children.push(change);
        }
    }
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(v) => writeln!(f, "✅ {}", v.green()),
            Change::Removed(v) => writeln!(f, "❌ {}", v.red()),
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(lines) => {
                writeln!(f, "{}", lines.iter().map(|l| format!(" {l}")).join(""))
            }
            Change::Modified(v, children) => {
                writeln!(f, "🔃 {}", v.blue())?;
                let body = children.iter().map(|c| c.to_string()).join("");
                writeln!(
                    f,
                    "{}",
                    body.split('\n')
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| format!("  {l}"))
                        .join("\n")
                )
            }
        }
    }
}

/// Line diff of two texts with the changed words emphasized, `None` when they are equal
pub fn text_changes(old: &str, new: &str) -> Option<Change> {
    let diff = TextDiff::from_lines(old, new);
    if diff.ratio() >= 1.0 {
        return None;
    }

    let mut lines = Vec::new();
    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            let mut line = match change.tag() {
                ChangeTag::Insert => format!("{}", "+".green()),
                ChangeTag::Delete => format!("{}", "-".red()),
                ChangeTag::Equal => continue,
            };
            for (emphasized, value) in change.iter_strings_lossy() {
                if !emphasized {
                    line.push_str(&format!("{}", value.dimmed()));
                } else if change.tag() == ChangeTag::Insert {
                    line.push_str(&format!("{}", value.green().underline()));
                } else {
                    line.push_str(&format!("{}", value.red().underline()));
                }
            }
            if change.missing_newline() {
                line.push('\n');
            }
            lines.push(line);
        }
    }
    Some(Change::Context(lines))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{text_changes, Change};

    #[test]
    fn equal_texts_have_no_changes() {
        assert_eq!(text_changes("a\nb\n", "a\nb\n"), None);
    }

    #[test]
    fn changed_lines_are_listed() {
        let Some(Change::Context(lines)) = text_changes("a\nb\nc\n", "a\nx\nc\n") else {
            panic!("expected a context change");
        };
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn record_nests_under_one_modification() {
        let mut result = None;
        Change::record(&mut result, "p_bastila.utc", Change::Added("a".into()));
        Change::record(&mut result, "p_bastila.utc", Change::Removed("b".into()));
        assert_eq!(
            result,
            Some(Change::Modified(
                "p_bastila.utc".into(),
                vec![Change::Added("a".into()), Change::Removed("b".into())]
            ))
        );
    }
}
