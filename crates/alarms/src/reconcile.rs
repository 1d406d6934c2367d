use std::collections::BTreeSet;

/// Targets with no alarm yet: `targets - existing`.
pub fn reconcile<T: Ord + Clone>(targets: &BTreeSet<T>, existing: &BTreeSet<T>) -> BTreeSet<T> {
    targets.difference(existing).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pending_is_set_difference() {
        let pending = reconcile(&set(&["i-1", "i-2", "i-3"]), &set(&["i-2"]));
        assert_eq!(pending, set(&["i-1", "i-3"]));
    }

    #[test]
    fn fully_covered_is_empty() {
        let targets = set(&["i-1", "i-2"]);
        assert!(reconcile(&targets, &targets).is_empty());
    }

    #[test]
    fn nothing_existing_keeps_all() {
        let targets = set(&["i-1", "i-2"]);
        assert_eq!(reconcile(&targets, &BTreeSet::new()), targets);
    }

    #[test]
    fn stale_alarms_are_ignored() {
        // alarms for instances that are gone do not show up as pending
        let pending = reconcile(&set(&["i-1"]), &set(&["i-1", "i-9"]));
        assert!(pending.is_empty());
    }

    #[test]
    fn works_for_any_ordered_id() {
        let targets: BTreeSet<u32> = [1, 2, 3].into();
        let existing: BTreeSet<u32> = [3].into();
        assert_eq!(reconcile(&targets, &existing), BTreeSet::from([1, 2]));
    }
}
