//! The display filter: computes the visible subset of aggregated entries.
//!
//! Pure function of (entries, query, active map, pinned set). Recomputed
//! wholesale on every keystroke, pin toggle, source toggle, and
//! aggregation pass; with a few hundred entries at most there is nothing
//! to be gained from incremental diffing.

use std::collections::HashSet;

use crate::feed::Entry;
use crate::sources::SourceRegistry;

/// Keep entries whose title contains `query` case-insensitively AND whose
/// source is active, then stable-partition pinned entries to the front.
///
/// Relative order inside the pinned and unpinned groups is preserved —
/// this is a partition, not a re-sort, so recency order from the
/// aggregator survives within each group.
pub fn visible_entries(
    entries: &[Entry],
    query: &str,
    registry: &SourceRegistry,
    pinned: &HashSet<String>,
) -> Vec<Entry> {
    let needle = query.to_lowercase();

    let (pinned_entries, rest): (Vec<Entry>, Vec<Entry>) = entries
        .iter()
        .filter(|e| registry.is_active(&e.source))
        .filter(|e| needle.is_empty() || e.title.to_lowercase().contains(&needle))
        .cloned()
        .partition(|e| pinned.contains(&e.link));

    let mut visible = pinned_entries;
    visible.extend(rest);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Source;
    use proptest::prelude::*;

    fn entry(title: &str, link: &str, source: &str) -> Entry {
        Entry {
            title: title.to_string(),
            link: link.to_string(),
            published: None,
            summary: None,
            source: source.to_string(),
        }
    }

    fn registry() -> SourceRegistry {
        SourceRegistry::from_parts(
            vec![
                Source {
                    name: "A".into(),
                    url: "https://a.example/rss".into(),
                },
                Source {
                    name: "B".into(),
                    url: "https://b.example/rss".into(),
                },
            ],
            Default::default(),
        )
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("Breaking news today", "l1", "A"),
            entry("Quiet afternoon", "l2", "B"),
            entry("More NEWS from the wire", "l3", "B"),
            entry("Final word", "l4", "A"),
        ]
    }

    #[test]
    fn empty_query_all_active_returns_everything() {
        let visible = visible_entries(&sample(), "", &registry(), &HashSet::new());
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn match_is_case_insensitive() {
        let visible = visible_entries(&sample(), "NEWS", &registry(), &HashSet::new());
        let titles: Vec<&str> = visible.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Breaking news today", "More NEWS from the wire"]);

        let lower = visible_entries(&sample(), "news", &registry(), &HashSet::new());
        assert_eq!(visible, lower);
    }

    #[test]
    fn inactive_source_is_excluded_without_mutating_input() {
        let entries = sample();
        let mut reg = registry();
        reg.toggle("B");

        let visible = visible_entries(&entries, "", &reg, &HashSet::new());
        assert!(visible.iter().all(|e| e.source == "A"));
        // The underlying list is untouched
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn pinned_entries_lead_preserving_relative_order() {
        let pinned: HashSet<String> = ["l2".to_string(), "l4".to_string()].into();
        let visible = visible_entries(&sample(), "", &registry(), &pinned);
        let links: Vec<&str> = visible.iter().map(|e| e.link.as_str()).collect();
        // l2 before l4 (input order within the pinned group),
        // l1 before l3 (input order within the unpinned group)
        assert_eq!(links, vec!["l2", "l4", "l1", "l3"]);
    }

    #[test]
    fn orphaned_source_tag_defaults_to_visible() {
        let entries = vec![entry("Ghost entry", "l9", "Removed Source")];
        let visible = visible_entries(&entries, "", &registry(), &HashSet::new());
        assert_eq!(visible.len(), 1);
    }

    proptest! {
        #[test]
        fn output_is_subset_of_input(query in ".{0,16}") {
            let entries = sample();
            let visible = visible_entries(&entries, &query, &registry(), &HashSet::new());
            prop_assert!(visible.len() <= entries.len());
            for e in &visible {
                prop_assert!(entries.contains(e));
            }
        }

        #[test]
        fn pinned_prefix_invariant(query in "[a-zA-Z ]{0,8}") {
            let entries = sample();
            let pinned: HashSet<String> = ["l3".to_string()].into();
            let visible = visible_entries(&entries, &query, &registry(), &pinned);
            // Once an unpinned entry appears, no pinned entry may follow
            let mut seen_unpinned = false;
            for e in &visible {
                if pinned.contains(&e.link) {
                    prop_assert!(!seen_unpinned);
                } else {
                    seen_unpinned = true;
                }
            }
        }
    }
}
