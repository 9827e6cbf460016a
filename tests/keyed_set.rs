use recordset::{CursorState, KeyedSet, RecordSetError};

fn letters() -> KeyedSet<&'static str, i32> {
    KeyedSet::from([("a", 1), ("b", 2), ("c", 3)])
}

#[test]
fn add_then_lookup() {
    let mut set = KeyedSet::new();
    set.add("k", 10).expect("vacant key");
    assert_eq!(set.lookup(&"k"), Some(&10));
    assert_eq!(set.lookup(&"missing"), None, "absence is not an error");
}

#[test]
fn add_on_occupied_key_fails_and_keeps_value() {
    let mut set = KeyedSet::new();
    set.add("k", 10).expect("vacant key");
    let err = set.add("k", 20).unwrap_err();
    assert!(matches!(err, RecordSetError::DuplicateKey { .. }));
    assert!(format!("{}", err).contains("\"k\""));
    assert_eq!(set.lookup(&"k"), Some(&10), "stored value left untouched");
    assert_eq!(set.count(), 1);
}

#[test]
fn replace_always_succeeds_and_keeps_position() {
    let mut set = letters();
    assert_eq!(set.replace("b", 20), Some(2));
    assert_eq!(set.replace("b", 200), Some(20));
    assert_eq!(set.replace("d", 4), None);
    let keys: Vec<_> = set.keys().copied().collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);
    assert_eq!(set[&"b"], 200);
}

#[test]
fn remove_is_a_no_op_when_absent() {
    let mut set = letters();
    assert_eq!(set.remove(&"b"), Some(2));
    assert!(!set.contains(&"b"));
    assert_eq!(set.remove(&"b"), None);
    let keys: Vec<_> = set.keys().copied().collect();
    assert_eq!(keys, vec!["a", "c"], "order of the rest preserved");
}

#[test]
fn contains_all_requires_every_key() {
    let set = letters();
    assert!(set.contains_all(&["a", "c"]));
    assert!(set.contains_all(&["a", "a"]), "duplicates are fine");
    assert!(!set.contains_all(&["a", "z"]));
    assert!(set.contains_all(&[] as &[&str]), "nothing to check");
}

#[test]
fn empty_and_clear() {
    let mut set = letters();
    assert!(!set.is_empty());
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
}

#[test]
fn map_visits_each_entry_once_in_order() {
    let set = letters();
    let mut visited = Vec::new();
    set.map(|value, key| visited.push((*key, *value)));
    assert_eq!(visited, vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn map_mut_changes_values_in_place() {
    let mut set = letters();
    set.map_mut(|value, _| *value *= 10);
    assert_eq!(set, KeyedSet::from([("a", 10), ("b", 20), ("c", 30)]));
}

#[test]
fn filter_keeps_matching_entries_in_order() {
    let set = KeyedSet::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
    let even = set.filter(|value, _| value % 2 == 0);
    let keys: Vec<_> = even.keys().copied().collect();
    assert_eq!(keys, vec!["b", "d"]);
    assert_eq!(set.count(), 4, "source untouched");
}

#[test]
fn union_prefers_the_other_operand() {
    let a = KeyedSet::from([("x", 1), ("y", 2)]);
    let b = KeyedSet::from([("y", 20), ("z", 30)]);
    let union = a.union(&b);
    assert_eq!(union.lookup(&"y"), b.lookup(&"y"));
    let keys: Vec<_> = union.keys().copied().collect();
    assert_eq!(keys, vec!["x", "y", "z"]);
}

#[test]
fn intersect_takes_values_from_the_argument() {
    let a = KeyedSet::from([("x", 1), ("y", 2), ("w", 0)]);
    let b = KeyedSet::from([("y", 20), ("z", 30), ("x", 10)]);
    let intersection = a.intersect(&b);
    assert_eq!(intersection, KeyedSet::from([("y", 20), ("x", 10)]));
    assert!(!intersection.contains(&"w"));
    assert!(!intersection.contains(&"z"));
}

#[test]
fn difference_is_symmetric() {
    let a = KeyedSet::from([("x", 1), ("y", 2)]);
    let b = KeyedSet::from([("y", 20), ("z", 30)]);
    let difference = a.difference(&b);
    assert_eq!(difference, KeyedSet::from([("x", 1), ("z", 30)]));
    assert_eq!(b.difference(&a), difference);
}

#[test]
fn subtract_is_one_sided() {
    let a = KeyedSet::from([("x", 1), ("y", 2)]);
    let b = KeyedSet::from([("y", 20), ("z", 30)]);
    assert_eq!(a.subtract(&b), KeyedSet::from([("x", 1)]));
    assert_eq!(b.subtract(&a), KeyedSet::from([("z", 30)]));
}

#[test]
fn merge_with_and_collect_let_later_values_win() {
    let set: KeyedSet<_, _> = vec![("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
    assert_eq!(set.lookup(&"a"), Some(&3));
    let keys: Vec<_> = set.keys().copied().collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn cursor_walks_through_states() {
    let set = letters();
    let mut cursor = set.cursor();
    assert_eq!(cursor.state(), CursorState::BeforeStart);
    assert!(!cursor.valid());
    cursor.rewind();
    assert_eq!(cursor.state(), CursorState::Positioned(&"a"));
    assert_eq!(cursor.current(), Some(&1));
    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.key(), Some(&"c"));
    cursor.advance();
    assert_eq!(cursor.state(), CursorState::Exhausted);
    assert!(!cursor.valid());
    assert_eq!(cursor.current(), None);
    cursor.advance();
    assert_eq!(cursor.state(), CursorState::Exhausted, "stays exhausted");
    cursor.rewind();
    assert_eq!(cursor.key(), Some(&"a"));
}

#[test]
fn cursor_on_empty_set_is_exhausted_after_rewind() {
    let set: KeyedSet<&str, i32> = KeyedSet::new();
    let mut cursor = set.cursor();
    cursor.rewind();
    assert_eq!(cursor.state(), CursorState::Exhausted);
}

#[test]
fn nested_cursors_are_independent() {
    let set = letters();
    let mut pairs = Vec::new();
    let mut outer = set.cursor();
    outer.rewind();
    while outer.valid() {
        let mut inner = set.cursor();
        inner.rewind();
        while inner.valid() {
            pairs.push((*outer.key().unwrap(), *inner.key().unwrap()));
            inner.advance();
        }
        outer.advance();
    }
    assert_eq!(pairs.len(), 9, "every pair visited");
    assert_eq!(pairs[0], ("a", "a"));
    assert_eq!(pairs[8], ("c", "c"));
}

#[test]
fn advance_before_rewind_starts_at_the_first_entry() {
    let set = letters();
    let mut cursor = set.cursor();
    cursor.advance();
    assert_eq!(cursor.state(), CursorState::Positioned(&"a"));
}
