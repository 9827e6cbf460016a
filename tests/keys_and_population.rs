use recordset::{Index, MemoryRecord, RecordCollection, RecordKey, RecordSetError, Settings};
use serde_json::json;

fn text(key: &str) -> RecordKey {
    RecordKey::Text(key.to_owned())
}

#[test]
fn populate_mints_consecutive_keys() {
    let mut widgets: RecordCollection<MemoryRecord> = RecordCollection::new();
    let keys = widgets.populate(2).expect("homogeneous records");
    assert_eq!(keys, vec![text("new_0"), text("new_1")]);
    assert_eq!(widgets.populate(1).expect("homogeneous records"), vec![text("new_2")]);
    assert_eq!(widgets.populated(), 3);
    assert!(widgets.values().all(MemoryRecord::is_new_record));
}

#[test]
fn removal_does_not_reset_the_counter() {
    let mut widgets: RecordCollection<MemoryRecord> = RecordCollection::new();
    widgets.populate(2).expect("homogeneous records");
    widgets.remove(&text("new_1"));
    assert_eq!(widgets.populate(1).expect("homogeneous records"), vec![text("new_2")]);
}

#[test]
fn clear_resets_the_counter() {
    let mut widgets: RecordCollection<MemoryRecord> = RecordCollection::new();
    widgets.populate(3).expect("homogeneous records");
    widgets.clear();
    assert!(widgets.is_empty());
    assert_eq!(widgets.populate(1).expect("homogeneous records"), vec![text("new_0")]);
}

#[test]
fn minted_keys_skip_occupied_slots() {
    let mut widgets: RecordCollection<MemoryRecord> = RecordCollection::new();
    widgets
        .add(text("new_0"), MemoryRecord::default())
        .expect("vacant key");
    assert_eq!(widgets.populate(1).expect("homogeneous records"), vec![text("new_1")]);
}

#[test]
fn keyless_inserts_share_the_counter() {
    let mut widgets: RecordCollection<MemoryRecord> = RecordCollection::new();
    let first = widgets.insert(MemoryRecord::from(json!({"name": "a"}))).expect("keyless");
    let second = widgets.insert(MemoryRecord::from(json!({"id": 5}))).expect("keyed");
    let third = widgets.populate_with(1, MemoryRecord::default).expect("homogeneous records");
    assert_eq!(first, text("new_0"));
    assert_eq!(second, RecordKey::Int(5));
    assert_eq!(third, vec![text("new_1")]);
}

#[test]
fn custom_prefix_from_settings() {
    let settings = Settings {
        new_key_prefix: String::from("tmp_"),
        ..Settings::default()
    };
    let mut widgets: RecordCollection<MemoryRecord> = RecordCollection::with_settings(&settings);
    assert_eq!(widgets.populate(1).expect("homogeneous records"), vec![text("tmp_0")]);
}

fn people() -> RecordCollection<MemoryRecord> {
    RecordCollection::from_records([
        MemoryRecord::from(json!({"id": 1, "email": "a@x.org", "team": "red"})),
        MemoryRecord::from(json!({"id": 2, "email": "b@x.org", "team": "blue"})),
        MemoryRecord::from(json!({"id": 3, "email": "c@x.org", "team": "red"})),
    ])
    .expect("distinct ids")
}

#[test]
fn reindex_by_unique_attribute() {
    let people = people();
    let by_email = people.reindex("email", false).expect("emails are unique");
    assert_eq!(by_email.index(), &Index::Attribute(String::from("email")));
    let keys: Vec<_> = by_email.keys().cloned().collect();
    assert_eq!(keys, vec![text("a@x.org"), text("b@x.org"), text("c@x.org")]);
    assert_eq!(people.count(), 3, "source untouched");
    assert!(people.contains(&RecordKey::Int(1)));
}

#[test]
fn reindex_collision_fails_without_replace() {
    let err = people().reindex("team", false).unwrap_err();
    assert!(matches!(err, RecordSetError::DuplicateKey { .. }));
}

#[test]
fn reindex_collision_keeps_the_later_member_with_replace() {
    let by_team = people().reindex("team", true).expect("replace resolves collisions");
    assert_eq!(by_team.count(), 2);
    assert_eq!(by_team[&text("red")].get("id"), Some(&json!(3)));
    let keys: Vec<_> = by_team.keys().cloned().collect();
    assert_eq!(keys, vec![text("red"), text("blue")], "first position kept");
}

#[test]
fn reindex_gives_placeholders_to_members_without_the_attribute() {
    let mut people = people();
    people
        .insert(MemoryRecord::from(json!({"id": 4})))
        .expect("new id");
    let by_email = people.into_reindexed("email", false).expect("emails are unique");
    assert!(by_email.contains(&text("new_0")));
    assert_eq!(by_email.populated(), 1);
}

#[test]
fn set_index_rekeys_in_place() {
    let mut people = people();
    assert!(!people.set_index(Index::PrimaryKey), "unchanged index");
    assert!(people.set_index(Index::from_names(&["team", "id"])));
    let keys: Vec<_> = people.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            RecordKey::composite([text("red"), RecordKey::Int(1)]),
            RecordKey::composite([text("blue"), RecordKey::Int(2)]),
            RecordKey::composite([text("red"), RecordKey::Int(3)]),
        ]
    );
    assert_eq!(keys[1].to_string(), "(blue, 2)");
}

#[test]
fn composite_primary_keys() {
    let enrolment = |student: i64, course: &str| {
        MemoryRecord::from(json!({"student": student, "course": course}))
            .with_primary_key(&["student", "course"])
    };
    let mut enrolments = RecordCollection::new();
    enrolments.insert(enrolment(1, "math")).expect("new pair");
    enrolments.insert(enrolment(1, "art")).expect("new pair");
    let err = enrolments.insert(enrolment(1, "math")).unwrap_err();
    assert!(matches!(err, RecordSetError::DuplicateKey { .. }));
    assert!(enrolments.contains(&RecordKey::composite([RecordKey::Int(1), text("math")])));
    assert!(
        !enrolments.contains(&text("1_math")),
        "components are not joined into text"
    );
}

#[test]
fn key_derivation_from_values() {
    assert_eq!(RecordKey::from_value(&json!(null)), None);
    assert_eq!(RecordKey::from_value(&json!("")), None);
    assert_eq!(RecordKey::from_value(&json!(7)), Some(RecordKey::Int(7)));
    assert_eq!(RecordKey::from_value(&json!(1.5)), Some(text("1.5")));
    assert_eq!(
        RecordKey::from_value(&json!([1, "a"])),
        Some(RecordKey::composite([RecordKey::Int(1), text("a")]))
    );
    assert_eq!(RecordKey::from_value(&json!([1, null])), None);
}

#[test]
fn placeholders_never_take_a_key_another_member_derives() {
    let records = [
        MemoryRecord::from(json!({"id": 1})),
        MemoryRecord::from(json!({"id": 2, "code": "new_0"})),
    ];
    let coded = RecordCollection::from_records(records).expect("distinct ids");

    let by_code = coded.reindex("code", false).expect("codes are unique");
    assert_eq!(by_code.count(), 2, "no member lost");
    assert_eq!(by_code[&text("new_0")].get("id"), Some(&json!(2)));
    assert_eq!(by_code[&text("new_1")].get("id"), Some(&json!(1)));

    let replaced = coded.reindex("code", true).expect("replace never fails");
    assert_eq!(replaced.count(), 2, "no member overwritten");

    let mut in_place = coded.clone();
    assert!(in_place.set_index(Index::Attribute(String::from("code"))));
    assert_eq!(in_place.count(), 2, "no member overwritten");
    assert_eq!(in_place[&text("new_0")].get("id"), Some(&json!(2)));
}
