//! Destination naming for history artifacts.

use std::collections::HashSet;

/// Base identifier for a run: `"Generation <n>"`.
pub fn base_name(run_number: usize) -> String {
    format!("Generation {run_number}")
}

/// Return `base` if unused, otherwise `"<base>_<i>"` for the smallest `i >= 1`
/// not in `existing`.
pub fn next_available_name(existing: &HashSet<String>, base: &str) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{base}_{i}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(1), "Generation 1");
        assert_eq!(base_name(42), "Generation 42");
    }

    #[test]
    fn test_unused_base_is_kept() {
        let existing = names(&["Generation 2"]);
        assert_eq!(next_available_name(&existing, "Generation 1"), "Generation 1");
    }

    #[test]
    fn test_first_collision_gets_suffix_one() {
        let existing = names(&["Generation 1"]);
        assert_eq!(next_available_name(&existing, "Generation 1"), "Generation 1_1");
    }

    #[test]
    fn test_smallest_gap_is_chosen() {
        let existing = names(&["Generation 1", "Generation 1_1", "Generation 1_3"]);
        assert_eq!(next_available_name(&existing, "Generation 1"), "Generation 1_2");
    }

    #[test]
    fn test_suffixes_of_other_bases_are_ignored() {
        let existing = names(&["Generation 1", "Generation 10_1", "Generation 1_1x"]);
        assert_eq!(next_available_name(&existing, "Generation 1"), "Generation 1_1");
    }
}
