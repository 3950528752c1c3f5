//! Name transformation — turn an original name plus a rule into a proposed
//! name, deterministically.
//!
//! Pure: no I/O, no host access, no mutable state. Malformed regex patterns
//! fail soft — the original name is kept and a warning is attached, so one
//! bad rule never aborts a batch.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// How `search` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplaceMode {
    /// Literal substring replacement.
    #[default]
    Simple,
    /// Regular-expression replacement with `$1`-style capture references.
    Regex,
}

/// A rename rule. Immutable value passed into planning; no identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameRule {
    pub mode: ReplaceMode,
    pub prefix: String,
    pub suffix: String,
    pub search: String,
    pub replace: String,
    /// Append a two-digit, 1-based position suffix (`_01`, `_02`, ...).
    pub add_index: bool,
    pub case_sensitive: bool,
}

impl RenameRule {
    /// True when the rule would leave every non-empty name unchanged.
    pub fn is_identity(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty() && self.search.is_empty() && !self.add_index
    }
}

/// Output of a single transformation.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub name: String,
    pub warnings: Vec<String>,
}

/// Zero-padded, 1-based position suffix shared by indexing and placeholder
/// generation.
fn position_tag(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Transform `original` at batch position `index` (0-based) according to
/// `rule`.
///
/// Empty originals short-circuit to a generated placeholder so the rest of
/// the rule cannot compound on a name that never existed.
pub fn transform(original: &str, rule: &RenameRule, index: usize) -> Transformed {
    if original.is_empty() {
        return Transformed {
            name: format!("unnamed_{}", position_tag(index)),
            warnings: vec![format!(
                "Target at position {} has no name; generated a placeholder",
                index + 1
            )],
        };
    }

    let mut warnings = Vec::new();
    let mut name = if rule.search.is_empty() {
        original.to_string()
    } else {
        match rule.mode {
            ReplaceMode::Regex => regex_replace(original, rule, &mut warnings),
            ReplaceMode::Simple => simple_replace(original, rule),
        }
    };

    name = format!("{}{}{}", rule.prefix, name, rule.suffix);

    if rule.add_index {
        name = format!("{}_{}", name, position_tag(index));
    }

    Transformed { name, warnings }
}

fn regex_replace(original: &str, rule: &RenameRule, warnings: &mut Vec<String>) -> String {
    match RegexBuilder::new(&rule.search)
        .case_insensitive(!rule.case_sensitive)
        .build()
    {
        Ok(re) => re
            .replace_all(original, brace_references(&rule.replace).as_str())
            .into_owned(),
        Err(e) => {
            warnings.push(format!(
                "Invalid pattern '{}' ({}); name left unchanged",
                rule.search, e
            ));
            original.to_string()
        }
    }
}

/// Rewrite `$N` capture references to the braced `${N}` form.
///
/// `Regex::replace_all` reads every word character after `$` as part of the
/// group name, so `$2_$1` would look up the nonexistent group `2_`. Bracing
/// numeric references keeps `$1`-style replacements meaning group 1 even
/// when a word character follows. `$$` and already-braced references pass
/// through untouched.
fn brace_references(replace: &str) -> String {
    let mut out = String::with_capacity(replace.len() + 4);
    let mut chars = replace.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some(d) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some(d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    out.push(*d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push('$'),
        }
    }
    out
}

/// Literal substring replacement. Case-insensitive matching finds the
/// occurrence without regard to case but inserts the replacement text
/// verbatim.
fn simple_replace(original: &str, rule: &RenameRule) -> String {
    if rule.case_sensitive {
        return original.replace(&rule.search, &rule.replace);
    }

    let haystack = original.to_lowercase();
    let needle = rule.search.to_lowercase();
    if needle.is_empty() {
        return original.to_string();
    }

    let mut result = String::with_capacity(original.len());
    let mut last = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(&needle) {
        let abs = start + pos;
        // Lowercasing can change byte lengths for some scripts; skip any
        // match whose offsets don't land on char boundaries in the original
        if original.is_char_boundary(abs) && original.is_char_boundary(abs + needle.len()) {
            result.push_str(&original[last..abs]);
            result.push_str(&rule.replace);
            last = abs + needle.len();
        }
        start = abs + needle.len().max(1);
    }
    result.push_str(&original[last..]);
    result
}
