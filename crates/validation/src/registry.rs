//! Registry of all available validation rules

use crate::rules::{NoDeprecatedRuleImpl, UniqueDirectiveNamesRuleImpl, UniqueTypeNamesRuleImpl};
use crate::traits::{DocumentRule, SdlRule};
use std::sync::{Arc, LazyLock};

/// Lazily initialized SDL rules.
/// Rules are created once and reused across all runs.
static SDL_RULES: LazyLock<Vec<Arc<dyn SdlRule>>> = LazyLock::new(|| {
    vec![
        Arc::new(UniqueDirectiveNamesRuleImpl),
        Arc::new(UniqueTypeNamesRuleImpl),
    ]
});

/// Lazily initialized document rules.
static DOCUMENT_RULES: LazyLock<Vec<Arc<dyn DocumentRule>>> =
    LazyLock::new(|| vec![Arc::new(NoDeprecatedRuleImpl)]);

#[must_use]
pub fn sdl_rules() -> &'static [Arc<dyn SdlRule>] {
    &SDL_RULES
}

#[must_use]
pub fn document_rules() -> &'static [Arc<dyn DocumentRule>] {
    &DOCUMENT_RULES
}

#[must_use]
pub fn all_rule_names() -> Vec<&'static str> {
    let mut names = Vec::new();

    for rule in sdl_rules() {
        names.push(rule.name());
    }
    for rule in document_rules() {
        names.push(rule.name());
    }

    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rule_names_sorted() {
        assert_eq!(
            all_rule_names(),
            vec!["no_deprecated", "unique_directive_names", "unique_type_names"]
        );
    }

    #[test]
    fn test_rule_descriptions_present() {
        assert!(sdl_rules().iter().all(|r| !r.description().is_empty()));
        assert!(document_rules().iter().all(|r| !r.description().is_empty()));
    }
}
