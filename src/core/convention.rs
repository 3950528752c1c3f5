//! Naming-convention validation — read-only evaluation of existing names
//! against a configurable rule set, with suggested fixes.
//!
//! Each rule carries an explicit polarity instead of inferring "must match"
//! vs "must not match" from its display name: `RequireMatch` flags names
//! that fail to match the pattern, `ForbidMatch` flags names that do match.

use crate::core::handle::RenamableHandle;
use crate::core::validate::{self, CharsetPolicy};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind tag matching every target.
pub const KIND_ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RulePolarity {
    /// Violation when the name does NOT match the pattern.
    RequireMatch,
    /// Violation when the name DOES match the pattern.
    ForbidMatch,
}

/// One naming rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingRule {
    pub id: String,
    pub description: String,
    /// Kind tag this rule applies to; `"All"` applies everywhere.
    pub applies_to: String,
    pub pattern: String,
    pub polarity: RulePolarity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl NamingRule {
    fn matches_kind(&self, kind: &str) -> bool {
        self.applies_to == KIND_ALL || self.applies_to.eq_ignore_ascii_case(kind)
    }
}

/// A rule set plus per-kind mandatory suffixes used by suggested fixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    pub rules: Vec<NamingRule>,
    /// Kind tag -> suffix every name of that kind must end with.
    pub required_suffixes: HashMap<String, String>,
}

impl RuleSet {
    /// Built-in defaults covering the common convention mistakes.
    pub fn builtin() -> Self {
        let rules = vec![
            NamingRule {
                id: "no-whitespace".to_string(),
                description: "Names must not contain whitespace".to_string(),
                applies_to: KIND_ALL.to_string(),
                pattern: r"\s".to_string(),
                polarity: RulePolarity::ForbidMatch,
                enabled: true,
            },
            NamingRule {
                id: "no-default-names".to_string(),
                description: "Placeholder names like 'GameObject (1)' are not allowed".to_string(),
                applies_to: "GameObject".to_string(),
                pattern: r"^GameObject(?: \(\d+\))?$".to_string(),
                polarity: RulePolarity::ForbidMatch,
                enabled: true,
            },
            NamingRule {
                id: "pascal-case".to_string(),
                description: "Names must start with an uppercase letter".to_string(),
                applies_to: KIND_ALL.to_string(),
                pattern: r"^[A-Z]".to_string(),
                polarity: RulePolarity::RequireMatch,
                enabled: true,
            },
            NamingRule {
                id: "material-suffix".to_string(),
                description: "Material names must end with _Mat".to_string(),
                applies_to: "Material".to_string(),
                pattern: r"_Mat$".to_string(),
                polarity: RulePolarity::RequireMatch,
                enabled: true,
            },
        ];

        let mut required_suffixes = HashMap::new();
        required_suffixes.insert("Material".to_string(), "_Mat".to_string());

        RuleSet {
            rules,
            required_suffixes,
        }
    }
}

/// Evaluate one target against every enabled, applicable rule.
///
/// An invalid rule pattern is reported as its own line — consistent with
/// the transformer's fail-soft regex handling — rather than aborting the
/// evaluation.
pub fn evaluate(target: &RenamableHandle, rule_set: &RuleSet) -> Vec<String> {
    let mut violations = Vec::new();

    for rule in &rule_set.rules {
        if !rule.enabled || !rule.matches_kind(&target.kind) {
            continue;
        }

        let matched = match Regex::new(&rule.pattern) {
            Ok(re) => re.is_match(&target.name),
            Err(e) => {
                violations.push(format!("{}: invalid pattern ({}); rule skipped", rule.id, e));
                continue;
            }
        };

        let violated = match rule.polarity {
            RulePolarity::RequireMatch => !matched,
            RulePolarity::ForbidMatch => matched,
        };

        if violated {
            violations.push(format!("{}: {}", rule.id, rule.description));
        }
    }

    violations
}

/// Suggest a convention-conforming replacement for `name`.
///
/// Strips whitespace, sanitizes disallowed characters through the
/// validation gate, capitalizes the first character, and appends the
/// kind's mandatory suffix when one is configured and missing.
pub fn suggest_fix(
    name: &str,
    kind: &str,
    is_asset: bool,
    rule_set: &RuleSet,
    policy: &CharsetPolicy,
) -> String {
    let stripped: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let mut fixed = validate::sanitize(&stripped, is_asset, policy);

    let mut chars = fixed.chars();
    if let Some(first) = chars.next() {
        fixed = first.to_uppercase().collect::<String>() + chars.as_str();
    }

    if let Some(suffix) = rule_set.required_suffixes.get(kind) {
        if !fixed.ends_with(suffix) {
            fixed.push_str(suffix);
        }
    }

    fixed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, kind: &str) -> RenamableHandle {
        RenamableHandle {
            stable_id: "obj-1".to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            is_asset: false,
            asset_path: None,
        }
    }

    #[test]
    fn forbid_match_flags_matching_names() {
        let violations = evaluate(&object("My Object", "GameObject"), &RuleSet::builtin());
        assert!(violations.iter().any(|v| v.starts_with("no-whitespace:")));
    }

    #[test]
    fn require_match_flags_non_matching_names() {
        let violations = evaluate(&object("lowercase", "GameObject"), &RuleSet::builtin());
        assert!(violations.iter().any(|v| v.starts_with("pascal-case:")));
    }

    #[test]
    fn conforming_name_has_no_violations() {
        let violations = evaluate(&object("PlayerSpawn", "GameObject"), &RuleSet::builtin());
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn kind_specific_rule_skips_other_kinds() {
        // material-suffix must not fire for textures
        let violations = evaluate(&object("Grass", "Texture"), &RuleSet::builtin());
        assert!(!violations.iter().any(|v| v.starts_with("material-suffix:")));

        let violations = evaluate(&object("Grass", "Material"), &RuleSet::builtin());
        assert!(violations.iter().any(|v| v.starts_with("material-suffix:")));
    }

    #[test]
    fn all_kind_matches_everything() {
        let rule_set = RuleSet {
            rules: vec![NamingRule {
                id: "no-temp".to_string(),
                description: "temp names".to_string(),
                applies_to: KIND_ALL.to_string(),
                pattern: "^temp".to_string(),
                polarity: RulePolarity::ForbidMatch,
                enabled: true,
            }],
            required_suffixes: HashMap::new(),
        };
        assert_eq!(evaluate(&object("temp_1", "Texture"), &rule_set).len(), 1);
        assert_eq!(evaluate(&object("temp_2", "Material"), &rule_set).len(), 1);
    }

    #[test]
    fn disabled_rules_are_ignored() {
        let mut rule_set = RuleSet::builtin();
        for rule in &mut rule_set.rules {
            rule.enabled = false;
        }
        assert!(evaluate(&object("bad name", "GameObject"), &rule_set).is_empty());
    }

    #[test]
    fn invalid_pattern_reports_and_continues() {
        let rule_set = RuleSet {
            rules: vec![
                NamingRule {
                    id: "broken".to_string(),
                    description: "broken".to_string(),
                    applies_to: KIND_ALL.to_string(),
                    pattern: "(unclosed".to_string(),
                    polarity: RulePolarity::ForbidMatch,
                    enabled: true,
                },
                NamingRule {
                    id: "pascal".to_string(),
                    description: "must be capitalized".to_string(),
                    applies_to: KIND_ALL.to_string(),
                    pattern: "^[A-Z]".to_string(),
                    polarity: RulePolarity::RequireMatch,
                    enabled: true,
                },
            ],
            required_suffixes: HashMap::new(),
        };
        let violations = evaluate(&object("lower", "GameObject"), &rule_set);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("invalid pattern"));
        assert!(violations[1].starts_with("pascal:"));
    }

    #[test]
    fn suggest_fix_strips_capitalizes_and_suffixes() {
        let policy = CharsetPolicy::default();
        let rule_set = RuleSet::builtin();
        assert_eq!(
            suggest_fix("my stone wall", "Material", false, &rule_set, &policy),
            "Mystonewall_Mat"
        );
    }

    #[test]
    fn suggest_fix_keeps_existing_suffix() {
        let policy = CharsetPolicy::default();
        let rule_set = RuleSet::builtin();
        assert_eq!(
            suggest_fix("stone_Mat", "Material", false, &rule_set, &policy),
            "Stone_Mat"
        );
    }

    #[test]
    fn suggest_fix_sanitizes_disallowed_chars() {
        let policy = CharsetPolicy::default();
        let rule_set = RuleSet::builtin();
        assert_eq!(
            suggest_fix("rock/cliff", "Texture", false, &rule_set, &policy),
            "Rock_cliff"
        );
    }

    #[test]
    fn rules_survive_serde_round_trip() {
        let json = serde_json::to_string(&RuleSet::builtin()).unwrap();
        let back: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rules.len(), 4);
        assert_eq!(back.rules[0].polarity, RulePolarity::ForbidMatch);
        assert_eq!(back.required_suffixes.get("Material").unwrap(), "_Mat");
    }
}
