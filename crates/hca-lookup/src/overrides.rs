//! Curated key overrides for renames the published migration table misses.
//!
//! A rule fires only when the requested (untranslated) key equals its `key`
//! exactly and the document version lies on the rule's side of `threshold`.
//! Rules are evaluated after the migration authority and take precedence
//! over its answer.

use crate::version::SchemaVersion;

/// Which side of the threshold a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applies {
    /// Documents strictly older than the threshold.
    Before,
    /// Documents at or newer than the threshold.
    From,
}

/// A single versioned key override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    pub key: &'static str,
    pub replacement: &'static str,
    pub threshold: SchemaVersion,
    pub applies: Applies,
}

impl OverrideRule {
    /// Returns `true` if this rule rewrites `key` for a document of `version`.
    pub fn matches(&self, key: &str, version: &SchemaVersion) -> bool {
        if key != self.key {
            return false;
        }
        match self.applies {
            Applies::Before => *version < self.threshold,
            Applies::From => *version >= self.threshold,
        }
    }
}

const fn before(
    key: &'static str,
    replacement: &'static str,
    threshold: SchemaVersion,
) -> OverrideRule {
    OverrideRule {
        key,
        replacement,
        threshold,
        applies: Applies::Before,
    }
}

/// The built-in override rules.
pub const CURATED_OVERRIDES: &[OverrideRule] = &[
    before(
        "cell_suspension.estimated_cell_count",
        "cell_suspension.total_estimated_cells",
        SchemaVersion::new(13, 0, 0),
    ),
    before(
        "cell_suspension.selected_cell_types",
        "cell_suspension.selected_cell_type",
        SchemaVersion::new(13, 0, 0),
    ),
    before(
        "library_preparation_protocol.library_construction_method",
        "library_preparation_protocol.library_construction_approach",
        SchemaVersion::new(6, 0, 0),
    ),
    before(
        "project.publications.title",
        "project.publications.publication_title",
        SchemaVersion::new(14, 0, 0),
    ),
    before(
        "project.publications.url",
        "project.publications.publication_url",
        SchemaVersion::new(14, 0, 0),
    ),
    before(
        "project.contributors.name",
        "project.contributors.contact_name",
        SchemaVersion::new(14, 0, 0),
    ),
    before(
        "specimen_from_organism.organ_parts",
        "specimen_from_organism.organ_part",
        SchemaVersion::new(10, 0, 0),
    ),
];

/// Returns the replacement for `key` from the first matching rule.
pub fn apply<'a>(
    rules: &'a [OverrideRule],
    key: &str,
    version: &SchemaVersion,
) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(key, version))
        .map(|rule| rule.replacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_applies_below_threshold_only() {
        let v12 = SchemaVersion::new(12, 3, 0);
        let v13 = SchemaVersion::new(13, 0, 0);
        assert_eq!(
            apply(CURATED_OVERRIDES, "cell_suspension.estimated_cell_count", &v12),
            Some("cell_suspension.total_estimated_cells")
        );
        assert_eq!(
            apply(CURATED_OVERRIDES, "cell_suspension.estimated_cell_count", &v13),
            None
        );
    }

    #[test]
    fn rule_requires_exact_key() {
        let v = SchemaVersion::new(1, 0, 0);
        assert_eq!(
            apply(CURATED_OVERRIDES, "cell_suspension.estimated_cell_count.x", &v),
            None
        );
    }

    #[test]
    fn from_rules() {
        let rules = [OverrideRule {
            key: "a.b",
            replacement: "a.c",
            threshold: SchemaVersion::new(2, 0, 0),
            applies: Applies::From,
        }];
        assert_eq!(apply(&rules, "a.b", &SchemaVersion::new(1, 9, 9)), None);
        assert_eq!(apply(&rules, "a.b", &SchemaVersion::new(2, 0, 0)), Some("a.c"));
    }
}
