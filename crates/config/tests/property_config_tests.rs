//! Property-based tests for placeholder resolution and permission merging.
//!
//! These tests use randomly generated inputs to check invariants that unit
//! tests only sample.
//!
//! Test coverage:
//! - PlaceholderResolver: text without tokens is unchanged
//! - PlaceholderResolver: known keys are substituted, unknown keys kept verbatim
//! - PermissionSet: at most one definition per (type, name) under override
//! - PermissionSet: the surviving definition is the last one declared
//! - PermissionSet: a batch sharing one source label still merges per key

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use leap_config::types::PermissionSet;
use leap_config::{NamedPermission, PlaceholderResolver, SysPermission, SysPermissionDefinition};

/// Strategy for property keys such as `db.url` or `app_name2`.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}(\\.[a-z][a-z0-9_]{0,6}){0,2}"
}

/// Strategy for literal text that cannot contain a placeholder.
fn literal_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 :/.,_-]{0,24}"
}

/// Strategy for permission declarations: (type index, name index, granted).
fn declaration_strategy() -> impl Strategy<Value = Vec<(usize, usize, bool)>> {
    prop::collection::vec((0usize..3, 0usize..4, any::<bool>()), 0..24)
}

fn definition(index: usize, perm_type: usize, name: usize, granted: bool) -> SysPermissionDefinition {
    labelled(format!("file:///perm.xml (at byte {index})"), perm_type, name, granted)
}

fn labelled(source: String, perm_type: usize, name: usize, granted: bool) -> SysPermissionDefinition {
    SysPermissionDefinition::new(
        source,
        format!("app.Type{perm_type}"),
        Arc::new(NamedPermission::new(format!("name{name}"), "*")) as Arc<dyn SysPermission>,
        granted,
    )
}

proptest! {
    #[test]
    fn test_text_without_tokens_is_unchanged(text in literal_strategy()) {
        let resolver = PlaceholderResolver::new();
        let resolved = resolver.resolve(&text, |_| None).unwrap();
        prop_assert_eq!(resolved, text);
    }

    #[test]
    fn test_known_keys_substituted_unknown_kept(
        known in key_strategy(),
        unknown in key_strategy(),
        value in literal_strategy(),
        before in literal_strategy(),
        after in literal_strategy(),
    ) {
        prop_assume!(known != unknown);
        let props: HashMap<String, String> = [(known.clone(), value.clone())].into_iter().collect();
        let resolver = PlaceholderResolver::new().with_ignore_unresolvable(true);

        let text = format!("{before}${{{known}}}{after}${{{unknown}}}");
        let resolved = resolver.resolve(&text, |k| props.get(k).cloned()).unwrap();
        prop_assert_eq!(resolved, format!("{before}{value}{after}${{{unknown}}}"));
    }

    #[test]
    fn test_empty_policy_blanks_unknown(key in key_strategy(), before in literal_strategy()) {
        let resolver = PlaceholderResolver::new().with_empty_unresolvable(true);
        let resolved = resolver.resolve(&format!("{before}${{{key}}}"), |_| None).unwrap();
        prop_assert_eq!(resolved, before);
    }

    #[test]
    fn test_override_merge_keeps_one_entry_per_key(decls in declaration_strategy()) {
        let mut set = PermissionSet::new();
        for (index, (perm_type, name, granted)) in decls.iter().enumerate() {
            set.add(definition(index, *perm_type, *name, *granted), true).unwrap();
        }

        let mut seen = HashSet::new();
        for def in set.as_slice() {
            prop_assert!(seen.insert((def.perm_type().to_string(), def.permission().name().to_string())));
        }

        let distinct: HashSet<_> = decls.iter().map(|(t, n, _)| (*t, *n)).collect();
        prop_assert_eq!(set.len(), distinct.len());
    }

    #[test]
    fn test_override_merge_keeps_last_declaration(decls in declaration_strategy()) {
        let mut set = PermissionSet::new();
        let mut last = HashMap::new();
        for (index, (perm_type, name, granted)) in decls.iter().enumerate() {
            set.add(definition(index, *perm_type, *name, *granted), true).unwrap();
            last.insert((format!("app.Type{perm_type}"), format!("name{name}")), (index, *granted));
        }

        let mut previous_index = None;
        for def in set.as_slice() {
            let key = (def.perm_type().to_string(), def.permission().name().to_string());
            let (index, granted) = last[&key];
            prop_assert_eq!(def.is_granted(), granted);
            prop_assert_eq!(def.source(), format!("file:///perm.xml (at byte {index})"));
            // Survivors appear in declaration order of their last definition.
            if let Some(prev) = previous_index {
                prop_assert!(index > prev);
            }
            previous_index = Some(index);
        }
    }

    #[test]
    fn test_strict_merge_rejects_any_repeated_key(decls in declaration_strategy()) {
        let mut set = PermissionSet::new();
        let mut seen = HashSet::new();
        for (index, (perm_type, name, granted)) in decls.iter().enumerate() {
            let result = set.add(definition(index, *perm_type, *name, *granted), false);
            prop_assert_eq!(result.is_ok(), seen.insert((*perm_type, *name)));
        }
    }

    #[test]
    fn test_shared_source_label_merges_per_key(decls in declaration_strategy(), override_existing in any::<bool>()) {
        let batch: Vec<_> = decls
            .iter()
            .map(|(perm_type, name, granted)| labelled("parent".to_string(), *perm_type, *name, *granted))
            .collect();
        let distinct: HashSet<_> = decls.iter().map(|(t, n, _)| (*t, *n)).collect();

        let mut set = PermissionSet::new();
        let result = set.add_all(batch, override_existing);
        if override_existing {
            prop_assert!(result.is_ok());
            prop_assert_eq!(set.len(), distinct.len());
            let mut last = HashMap::new();
            for (perm_type, name, granted) in &decls {
                last.insert((format!("app.Type{perm_type}"), format!("name{name}")), *granted);
            }
            for def in set.as_slice() {
                let key = (def.perm_type().to_string(), def.permission().name().to_string());
                prop_assert_eq!(def.is_granted(), last[&key]);
            }
        } else {
            prop_assert_eq!(result.is_ok(), distinct.len() == decls.len());
        }
    }
}
