use super::SectionRegistry;
use crate::error::RegistryError;
use crate::section::ORDER_SPACING;

fn order_of(registry: &SectionRegistry, id: &str) -> i64 {
    registry.get(id).unwrap().order
}

fn level_of(registry: &SectionRegistry, id: &str) -> usize {
    registry.get(id).unwrap().level
}

#[test]
fn test_roots_ordered_by_registration() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("B", "b", None).unwrap();
    registry.add_section("C", "c", None).unwrap();

    assert!(order_of(&registry, "a") < order_of(&registry, "b"));
    assert!(order_of(&registry, "b") < order_of(&registry, "c"));
    assert_eq!(
        order_of(&registry, "b") - order_of(&registry, "a"),
        ORDER_SPACING
    );
    for id in ["a", "b", "c"] {
        assert_eq!(level_of(&registry, id), 0, "{id} should be a root");
    }
}

#[test]
fn test_child_level_follows_parent() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("B", "b", Some("a")).unwrap();
    registry.add_section("C", "c", Some("b")).unwrap();

    assert_eq!(level_of(&registry, "b"), level_of(&registry, "a") + 1);
    assert_eq!(level_of(&registry, "c"), level_of(&registry, "b") + 1);
}

#[test]
fn test_children_keyed_inside_parent_window() {
    let mut registry = SectionRegistry::new();
    registry.add_section("One", "one", None).unwrap();
    registry.add_section("Two", "two", None).unwrap();
    // Registered after "two" but belongs under "one".
    registry.add_section("One A", "one-a", Some("one")).unwrap();
    registry.add_section("One B", "one-b", Some("one")).unwrap();
    registry.add_section("One A i", "one-a-i", Some("one-a")).unwrap();

    let ordered: Vec<&str> = registry.ordered().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ordered, vec!["one", "one-a", "one-a-i", "one-b", "two"]);

    assert_eq!(order_of(&registry, "two"), ORDER_SPACING);
    assert!(order_of(&registry, "one-b") < ORDER_SPACING);
}

#[test]
fn test_root_keys_stable_when_children_added() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("B", "b", None).unwrap();
    let before = (order_of(&registry, "a"), order_of(&registry, "b"));

    registry.add_section("A1", "a1", Some("a")).unwrap();
    registry.add_section("A2", "a2", Some("a")).unwrap();

    assert_eq!(before, (order_of(&registry, "a"), order_of(&registry, "b")));
}

#[test]
fn test_rejects_empty_id() {
    let mut registry = SectionRegistry::new();
    assert_eq!(
        registry.add_section("Nameless", "", None).unwrap_err(),
        RegistryError::EmptyId
    );
    assert!(registry.is_empty());
}

#[test]
fn test_rejects_duplicate_id() {
    let mut registry = SectionRegistry::new();
    registry.add_section("Intro", "intro", None).unwrap();
    let err = registry.add_section("Intro again", "intro", None).unwrap_err();

    assert_eq!(
        err,
        RegistryError::DuplicateId {
            id: "intro".to_string()
        }
    );
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("intro").unwrap().name, "Intro");
}

#[test]
fn test_rejects_unknown_parent() {
    let mut registry = SectionRegistry::new();
    let err = registry
        .add_section("Orphan", "orphan", Some("missing"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownParent { .. }));
    assert!(!registry.contains("orphan"));
}

#[test]
fn test_children_and_ancestors() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("B", "b", Some("a")).unwrap();
    registry.add_section("C", "c", Some("a")).unwrap();
    registry.add_section("D", "d", Some("c")).unwrap();

    let children: Vec<&str> = registry.children("a").map(|s| s.id.as_str()).collect();
    assert_eq!(children, vec!["b", "c"]);

    let ancestors: Vec<&str> = registry
        .ancestors("d")
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ancestors, vec!["c", "a"]);
    assert!(registry.ancestors("a").is_empty());
}

#[test]
fn test_remove_reparents_children_and_recomputes() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("B", "b", Some("a")).unwrap();
    registry.add_section("C", "c", Some("b")).unwrap();
    registry.add_section("Z", "z", None).unwrap();

    let removed = registry.remove_section("b").unwrap();
    assert_eq!(removed.id, "b");
    assert!(!registry.contains("b"));

    let c = registry.get("c").unwrap();
    assert_eq!(c.parent.as_deref(), Some("a"));
    assert_eq!(c.level, 1);
    assert_eq!(order_of(&registry, "z"), ORDER_SPACING);
}

#[test]
fn test_remove_root_promotes_children_to_roots() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("A1", "a1", Some("a")).unwrap();
    registry.add_section("B", "b", None).unwrap();

    registry.remove_section("a");

    assert_eq!(level_of(&registry, "a1"), 0);
    assert!(order_of(&registry, "a1") < order_of(&registry, "b"));
    assert!(registry.remove_section("a").is_none());
}

#[test]
fn test_remove_active_leaves_nothing_active() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.add_section("B", "b", None).unwrap();
    assert!(registry.set_active("a"));

    let removed = registry.remove_section("a").unwrap();

    assert!(removed.is_active);
    assert!(registry.active_section().is_none());
}

#[test]
fn test_set_active_unknown_is_noop() {
    let mut registry = SectionRegistry::new();
    registry.add_section("A", "a", None).unwrap();
    registry.set_active("a");

    assert!(!registry.set_active("nope"));
    assert_eq!(registry.active_section().unwrap().id, "a");
}
