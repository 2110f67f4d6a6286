use super::*;
use crate::error::CoreError;
use std::collections::BTreeSet;

fn names(total: i64) -> BTreeSet<&'static str> {
    badge_names(total).into_iter().collect()
}

#[test]
fn log_activity_accumulates() {
    assert_eq!(log_activity(0, 20), Ok(20));
    assert_eq!(log_activity(20, 50), Ok(70));
    assert_eq!(log_activity(70, 0), Ok(70));
}

#[test]
fn log_activity_rejects_negative_points() {
    assert!(matches!(
        log_activity(30, -5),
        Err(CoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        log_activity(-1, 5),
        Err(CoreError::InvalidArgument(_))
    ));
}

#[test]
fn log_activity_reports_overflow() {
    assert_eq!(log_activity(i64::MAX, 1), Err(CoreError::Overflow));
    assert_eq!(log_activity(i64::MAX - 1, 1), Ok(i64::MAX));
}

#[test]
fn badges_follow_thresholds() {
    assert!(names(0).is_empty());
    assert!(names(49).is_empty());
    assert_eq!(names(50), BTreeSet::from(["Eco Rookie"]));
    assert_eq!(names(99), BTreeSet::from(["Eco Rookie"]));
    assert_eq!(
        names(150),
        BTreeSet::from(["Eco Rookie", "Sustainable Star"])
    );
    assert_eq!(
        names(200),
        BTreeSet::from(["Eco Rookie", "Sustainable Star", "Eco Warrior"])
    );
    assert_eq!(names(10_000).len(), 3);
}

#[test]
fn badge_derivation_is_pure() {
    for total in [0, 49, 50, 100, 199, 200, 999] {
        assert_eq!(derive_badges(total), derive_badges(total));
    }
}

#[test]
fn badge_derivation_is_monotonic() {
    for t1 in 0..=260 {
        for t2 in (t1..=260).step_by(7) {
            assert!(
                derive_badges(t1).is_subset(&derive_badges(t2)),
                "{t1} <= {t2}"
            );
        }
    }
}

#[test]
fn badges_are_ordered_by_threshold() {
    let ordered = derive_badges(500).into_iter().collect::<Vec<_>>();
    assert_eq!(ordered, Badge::ALL.to_vec());
    for pair in Badge::ALL.windows(2) {
        assert!(pair[0].threshold() < pair[1].threshold());
    }
    assert_eq!(Badge::from_name("Eco Warrior"), Some(Badge::EcoWarrior));
    assert_eq!(Badge::from_name("eco warrior"), None);
}

#[test]
fn next_badge_reports_remaining_points() {
    assert_eq!(next_badge(0), Some((Badge::EcoRookie, 50)));
    assert_eq!(next_badge(50), Some((Badge::SustainableStar, 50)));
    assert_eq!(next_badge(180), Some((Badge::EcoWarrior, 20)));
    assert_eq!(next_badge(200), None);
}

#[test]
fn level_display_keeps_full_level_at_exact_multiples() {
    assert_eq!(points_to_next_level(0), 100);
    assert_eq!(points_to_next_level(30), 70);
    assert_eq!(points_to_next_level(100), 100);
    assert_eq!(points_to_next_level(199), 1);
    assert_eq!(level_progress(0), 0.0);
    assert_eq!(level_progress(125), 0.25);
}

#[test]
fn activity_entry_validation() {
    let entry = ActivityEntry::try_new("  Recycled bottles ", 20, 1).unwrap();
    assert_eq!(entry.label, "Recycled bottles");
    assert!(ActivityEntry::try_new(" ", 20, 1).is_err());
    assert!(ActivityEntry::try_new("Bike", -1, 1).is_err());
}

#[test]
fn progress_update_reports_newly_unlocked_badges() {
    let start = EcoProgress::default();
    assert_eq!(start.total(), 0);
    assert!(start.badges().is_empty());

    let first = start
        .apply(&ActivityEntry::try_new("Thrift haul", 60, 1).unwrap())
        .unwrap();
    assert_eq!(first.progress.total(), 60);
    assert_eq!(first.unlocked, vec![Badge::EcoRookie]);

    let second = first
        .progress
        .apply(&ActivityEntry::try_new("Swap meet", 150, 2).unwrap())
        .unwrap();
    assert_eq!(second.progress.total(), 210);
    assert_eq!(
        second.unlocked,
        vec![Badge::SustainableStar, Badge::EcoWarrior]
    );

    let third = second
        .progress
        .apply(&ActivityEntry::try_new("Repair", 5, 3).unwrap())
        .unwrap();
    assert!(third.unlocked.is_empty());
    assert!(EcoProgress::from_total(-3).is_err());
}
