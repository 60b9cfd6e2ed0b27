use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, PostDataset};

// ---------------------------------------------------------------------------
// Filter predicate: which category values are selected per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state: maps dimension → set of selected values.
/// If a dimension is absent or its set is empty, it means "no filter" (show all).
pub type FilterState = BTreeMap<Dimension, BTreeSet<String>>;

/// Return indices of posts that pass all active filters, in dataset order.
///
/// A post passes a dimension filter when:
/// * The dimension is not present in `filters` → passes (no constraint)
/// * The selected set for that dimension is empty → passes (select-all)
/// * The post's value for that dimension is in the selected set → passes
///
/// Dimension filters combine with AND.
pub fn filtered_indices(dataset: &PostDataset, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(Dimension, &BTreeSet<String>)> = filters
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .map(|(dim, selected)| (*dim, selected))
        .collect();

    dataset
        .posts
        .iter()
        .enumerate()
        .filter(|(_, post)| {
            active
                .iter()
                .all(|(dim, selected)| selected.contains(dim.value(post)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Number of dimensions currently restricting the view.
pub fn active_filter_count(filters: &FilterState) -> usize {
    filters.values().filter(|s| !s.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::{LoadReport, Post};

    fn dataset(rows: &[(&str, &str, &str)]) -> PostDataset {
        let posts = rows
            .iter()
            .map(|(platform, sentiment, country)| Post {
                platform: platform.to_string(),
                sentiment: sentiment.to_string(),
                country: country.to_string(),
                ..Default::default()
            })
            .collect();
        PostDataset::from_posts(posts, LoadReport::default())
    }

    fn select(dim: Dimension, values: &[&str]) -> FilterState {
        let mut filters = FilterState::new();
        filters.insert(dim, values.iter().map(|v| v.to_string()).collect());
        filters
    }

    #[test]
    fn selecting_positive_keeps_two_of_three() {
        let ds = dataset(&[
            ("Twitter", "Positive", "USA"),
            ("Twitter", "Negative", "USA"),
            ("Instagram", "Positive", "UK"),
        ]);
        let idx = filtered_indices(&ds, &select(Dimension::Sentiment, &["Positive"]));
        assert_eq!(idx, [0, 2]);
    }

    #[test]
    fn empty_selection_is_select_all() {
        let ds = dataset(&[("Twitter", "Positive", "USA"), ("Instagram", "Negative", "UK")]);
        let idx = filtered_indices(&ds, &select(Dimension::Country, &[]));
        assert_eq!(idx, [0, 1]);
        assert_eq!(active_filter_count(&select(Dimension::Country, &[])), 0);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let ds = dataset(&[
            ("Twitter", "Positive", "USA"),
            ("Twitter", "Negative", "UK"),
            ("Instagram", "Positive", "UK"),
            ("Twitter", "Positive", "UK"),
        ]);
        let mut filters = select(Dimension::Platform, &["Twitter"]);
        filters.insert(Dimension::Country, ["UK".to_string()].into());
        assert_eq!(filtered_indices(&ds, &filters), [1, 3]);
        assert_eq!(active_filter_count(&filters), 2);
    }

    #[test]
    fn unknown_value_selects_nothing() {
        let ds = dataset(&[("Twitter", "Positive", "USA")]);
        let idx = filtered_indices(&ds, &select(Dimension::Platform, &["Mastodon"]));
        assert!(idx.is_empty());
    }

    // -- property tests over small random datasets --

    const PLATFORMS: [&str; 3] = ["Twitter", "Instagram", "Facebook"];
    const SENTIMENTS: [&str; 4] = ["Positive", "Negative", "Neutral", "Joy"];
    const COUNTRIES: [&str; 3] = ["USA", "UK", "India"];

    fn arb_dataset() -> impl Strategy<Value = PostDataset> {
        prop::collection::vec((0..3usize, 0..4usize, 0..3usize), 0..40).prop_map(|rows| {
            let posts = rows
                .into_iter()
                .map(|(p, s, c)| Post {
                    platform: PLATFORMS[p].into(),
                    sentiment: SENTIMENTS[s].into(),
                    country: COUNTRIES[c].into(),
                    ..Default::default()
                })
                .collect();
            PostDataset::from_posts(posts, LoadReport::default())
        })
    }

    fn arb_selection(pool: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<String>> {
        prop::sample::subsequence(pool, 0..=pool.len())
            .prop_map(|vals| vals.into_iter().map(str::to_string).collect())
    }

    proptest! {
        #[test]
        fn prop_empty_selection_matches_no_filter(ds in arb_dataset(), which in 0..3usize) {
            let dim = Dimension::ALL[which];
            let none = filtered_indices(&ds, &FilterState::new());
            let empty = filtered_indices(&ds, &select(dim, &[]));
            prop_assert_eq!(none.len(), ds.len());
            prop_assert_eq!(empty, none);
        }

        #[test]
        fn prop_results_are_members_of_selection(
            ds in arb_dataset(),
            selected in arb_selection(&SENTIMENTS),
        ) {
            let mut filters = FilterState::new();
            filters.insert(Dimension::Sentiment, selected.clone());
            for i in filtered_indices(&ds, &filters) {
                let value = &ds.posts[i].sentiment;
                prop_assert!(selected.is_empty() || selected.contains(value));
            }
        }

        #[test]
        fn prop_two_filters_equal_intersection(
            ds in arb_dataset(),
            platforms in arb_selection(&PLATFORMS),
            countries in arb_selection(&COUNTRIES),
        ) {
            let mut both = FilterState::new();
            both.insert(Dimension::Platform, platforms.clone());
            both.insert(Dimension::Country, countries.clone());
            let combined = filtered_indices(&ds, &both);

            let mut only_platform = FilterState::new();
            only_platform.insert(Dimension::Platform, platforms);
            let mut only_country = FilterState::new();
            only_country.insert(Dimension::Country, countries);
            let a: BTreeSet<usize> = filtered_indices(&ds, &only_platform).into_iter().collect();
            let b: BTreeSet<usize> = filtered_indices(&ds, &only_country).into_iter().collect();
            let expected: Vec<usize> = a.intersection(&b).copied().collect();

            prop_assert_eq!(combined, expected);
        }
    }
}
