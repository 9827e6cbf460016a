use proptest::prelude::*;
use recordset::KeyedSet;

fn keyed_set() -> impl Strategy<Value = KeyedSet<u8, u16>> {
    prop::collection::vec((0u8..32, any::<u16>()), 0..24)
        .prop_map(|entries| entries.into_iter().collect::<KeyedSet<u8, u16>>())
}

proptest! {
    #[test]
    fn union_holds_every_key(a in keyed_set(), b in keyed_set()) {
        let union = a.union(&b);
        prop_assert!(union.contains_all(a.keys()));
        prop_assert!(union.contains_all(b.keys()));
        for (key, value) in &b {
            prop_assert_eq!(union.lookup(key), Some(value));
        }
    }

    #[test]
    fn intersect_is_the_other_side_restricted(a in keyed_set(), b in keyed_set()) {
        let intersection = a.intersect(&b);
        for (key, value) in &intersection {
            prop_assert!(a.contains(key));
            prop_assert_eq!(b.lookup(key), Some(value));
        }
        let shared = a.keys().filter(|key| b.contains(key)).count();
        prop_assert_eq!(intersection.count(), shared);
    }

    #[test]
    fn difference_partitions_the_union(a in keyed_set(), b in keyed_set()) {
        let difference = a.difference(&b);
        let intersection = a.intersect(&b);
        prop_assert_eq!(difference.count() + intersection.count(), a.union(&b).count());
        prop_assert!(difference.keys().all(|key| !intersection.contains(key)));
        prop_assert_eq!(a.subtract(&b).count() + b.subtract(&a).count(), difference.count());
    }

    #[test]
    fn add_never_overwrites(a in keyed_set(), key in 0u8..32, value in any::<u16>()) {
        let mut set = a.clone();
        let added = set.add(key, value);
        prop_assert_eq!(added.is_ok(), !a.contains(&key));
        prop_assert_eq!(set.lookup(&key), a.lookup(&key).or(Some(&value)));
    }
}
