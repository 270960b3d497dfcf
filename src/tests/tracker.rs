use super::ActiveSectionTracker;
use std::cell::Cell;
use std::rc::Rc;

fn tracker_with_counter() -> (ActiveSectionTracker, Rc<Cell<usize>>) {
    let redraws = Rc::new(Cell::new(0));
    let counter = Rc::clone(&redraws);
    let tracker = ActiveSectionTracker::new(move || counter.set(counter.get() + 1));
    (tracker, redraws)
}

fn active_count(tracker: &ActiveSectionTracker) -> usize {
    tracker.sections().iter().filter(|s| s.is_active).count()
}

#[test]
fn test_select_active_is_exclusive() {
    let (mut tracker, _) = tracker_with_counter();
    for id in ["s1", "s2", "s3"] {
        tracker.add_section(id, id, None, false).unwrap();
    }

    for id in ["s1", "s3", "s2", "s3", "s1"] {
        tracker.select_active(id);
        assert!(active_count(&tracker) <= 1);
        assert_eq!(tracker.active_section().unwrap().id, id);
    }
}

#[test]
fn test_select_active_idempotent() {
    let (mut tracker, redraws) = tracker_with_counter();
    tracker.add_section("One", "one", None, false).unwrap();
    tracker.add_section("Two", "two", None, false).unwrap();

    assert!(tracker.select_active("two"));
    let once: Vec<bool> = tracker.sections().iter().map(|s| s.is_active).collect();

    assert!(!tracker.select_active("two"));
    let twice: Vec<bool> = tracker.sections().iter().map(|s| s.is_active).collect();

    assert_eq!(once, twice);
    assert_eq!(redraws.get(), 1, "Repeat selection should not redraw");
}

#[test]
fn test_unknown_id_is_noop() {
    let (mut tracker, redraws) = tracker_with_counter();
    tracker.add_section("One", "one", None, false).unwrap();
    tracker.select_active("one");
    let before = redraws.get();

    assert!(!tracker.select_active(""));
    assert!(!tracker.select_active("nonexistent"));

    assert_eq!(tracker.active_section().unwrap().id, "one");
    assert_eq!(redraws.get(), before);
}

#[test]
fn test_add_section_notify_controls_redraw() {
    let (mut tracker, redraws) = tracker_with_counter();
    tracker.add_section("Quiet", "quiet", None, false).unwrap();
    assert_eq!(redraws.get(), 0);

    let section = tracker.add_section("Loud", "loud", None, true).unwrap();
    assert_eq!(section.id, "loud");
    assert_eq!(redraws.get(), 1);
}

#[test]
fn test_failed_add_does_not_redraw() {
    let (mut tracker, redraws) = tracker_with_counter();
    tracker.add_section("One", "one", None, true).unwrap();
    assert!(tracker.add_section("One", "one", None, true).is_err());
    assert_eq!(redraws.get(), 1);
}

#[test]
fn test_remove_active_section_promotes_nothing() {
    let (mut tracker, _) = tracker_with_counter();
    tracker.add_section("One", "one", None, false).unwrap();
    tracker.add_section("Two", "two", None, false).unwrap();
    tracker.select_active("one");

    tracker.remove_section("one").unwrap();

    assert!(tracker.active_section().is_none());
    assert_eq!(active_count(&tracker), 0);
}

#[test]
fn test_update_always_redraws() {
    let (mut tracker, redraws) = tracker_with_counter();
    tracker.update();
    tracker.update();
    assert_eq!(redraws.get(), 2);
}
