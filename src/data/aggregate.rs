use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{Dimension, Post, PostDataset};
use super::stats::{mean, pearson, BoxSummary};

// ---------------------------------------------------------------------------
// View – the filtered subset the aggregations run over
// ---------------------------------------------------------------------------

/// Borrowed filtered view: the dataset plus the indices that passed.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub dataset: &'a PostDataset,
    pub indices: &'a [usize],
}

impl<'a> View<'a> {
    pub fn new(dataset: &'a PostDataset, indices: &'a [usize]) -> Self {
        Self { dataset, indices }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Post> + 'a {
        let posts = &self.dataset.posts;
        self.indices.iter().map(move |&i| &posts[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Count occurrences and order by count descending.  Equal counts keep the
/// order in which the values were first encountered.
pub fn rank_first_seen<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    // `sort_by` is stable, so first-seen order survives among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Frequency of every distinct value of `dim`.
pub fn value_counts(view: View<'_>, dim: Dimension) -> Vec<(String, usize)> {
    rank_first_seen(view.iter().map(|p| dim.value(p)))
}

/// The `n` most frequent hashtags across the view.
pub fn top_hashtags(view: View<'_>, n: usize) -> Vec<(String, usize)> {
    let mut ranked = rank_first_seen(view.iter().flat_map(Post::hashtag_tokens));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The three headline metrics.  Means are `None` over an empty view.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub avg_likes: Option<f64>,
    pub avg_retweets: Option<f64>,
}

impl Summary {
    pub fn compute(view: View<'_>) -> Self {
        let likes: Vec<f64> = view.iter().map(|p| p.likes).collect();
        let retweets: Vec<f64> = view.iter().map(|p| p.retweets).collect();
        Summary {
            total: view.len(),
            avg_likes: mean(&likes),
            avg_retweets: mean(&retweets),
        }
    }
}

/// One wedge of a share chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Fraction of the total in `0.0..=1.0`.
    pub share: f64,
}

pub fn shares(counts: &[(String, usize)]) -> Vec<Slice> {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .map(|(label, count)| Slice {
            label: label.clone(),
            count: *count,
            share: *count as f64 / total as f64,
        })
        .collect()
}

/// Posts per (platform, sentiment) pair, zero-filled.
///
/// Both axes are sorted, matching a grouped count over the two keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossTab {
    pub platforms: Vec<String>,
    pub sentiments: Vec<String>,
    /// `counts[platform][sentiment]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn compute(view: View<'_>) -> Self {
        let mut cells: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        let mut platforms: BTreeSet<&str> = BTreeSet::new();
        let mut sentiments: BTreeSet<&str> = BTreeSet::new();
        for post in view.iter() {
            platforms.insert(&post.platform);
            sentiments.insert(&post.sentiment);
            *cells
                .entry((post.platform.as_str(), post.sentiment.as_str()))
                .or_default() += 1;
        }

        let counts = platforms
            .iter()
            .map(|p| {
                sentiments
                    .iter()
                    .map(|s| cells.get(&(*p, *s)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        CrossTab {
            platforms: platforms.into_iter().map(str::to_string).collect(),
            sentiments: sentiments.into_iter().map(str::to_string).collect(),
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Count column for one sentiment, one entry per platform.
    pub fn series(&self, sentiment_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.counts.iter().map(move |row| row[sentiment_idx])
    }
}

/// The numeric fields that enter the correlation matrix, in display order.
pub const NUMERIC_FIELDS: [&str; 3] = ["Likes", "Retweets", "Hour"];

/// Symmetric Pearson matrix over [`NUMERIC_FIELDS`].  The diagonal is 1.
/// Off-diagonal cells are `None` where a column has no variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatrix {
    pub values: [[Option<f64>; 3]; 3],
}

impl CorrelationMatrix {
    /// `None` when fewer than two posts are in view.
    pub fn compute(view: View<'_>) -> Option<Self> {
        if view.len() < 2 {
            return None;
        }
        let columns: [Vec<f64>; 3] = [
            view.iter().map(|p| p.likes).collect(),
            view.iter().map(|p| p.retweets).collect(),
            view.iter().map(|p| p.hour as f64).collect(),
        ];

        let mut values = [[None; 3]; 3];
        for i in 0..3 {
            values[i][i] = Some(1.0);
            for j in (i + 1)..3 {
                let r = pearson(&columns[i], &columns[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Some(CorrelationMatrix { values })
    }
}

// ---------------------------------------------------------------------------
// Dashboard – every aggregation for one filtered view
// ---------------------------------------------------------------------------

/// All chart inputs, recomputed once per filter change.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub summary: Summary,
    pub sentiment_shares: Vec<Slice>,
    /// Likes per sentiment, sentiments in first-seen order.
    pub likes_by_sentiment: Vec<(String, BoxSummary)>,
    pub platform_sentiment: CrossTab,
    /// Posts per hour, ascending by hour.
    pub hour_counts: Vec<(i64, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub top_hashtags: Vec<(String, usize)>,
    pub correlation: Option<CorrelationMatrix>,
}

impl Dashboard {
    pub fn compute(view: View<'_>, top_n: usize) -> Self {
        let mut top_countries = value_counts(view, Dimension::Country);
        top_countries.truncate(top_n);

        Dashboard {
            summary: Summary::compute(view),
            sentiment_shares: shares(&value_counts(view, Dimension::Sentiment)),
            likes_by_sentiment: likes_by_sentiment(view),
            platform_sentiment: CrossTab::compute(view),
            hour_counts: hour_counts(view),
            top_countries,
            top_hashtags: top_hashtags(view, top_n),
            correlation: CorrelationMatrix::compute(view),
        }
    }
}

fn likes_by_sentiment(view: View<'_>) -> Vec<(String, BoxSummary)> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for post in view.iter() {
        groups
            .entry(&post.sentiment)
            .or_insert_with(|| {
                order.push(&post.sentiment);
                Vec::new()
            })
            .push(post.likes);
    }
    order
        .into_iter()
        .filter_map(|s| {
            let summary = BoxSummary::from_values(groups.get(s)?)?;
            Some((s.to_string(), summary))
        })
        .collect()
}

fn hour_counts(view: View<'_>) -> Vec<(i64, usize)> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for post in view.iter() {
        *counts.entry(post.hour).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LoadReport;

    fn post(sentiment: &str, platform: &str, hashtags: &str, hour: i64, likes: f64) -> Post {
        Post {
            sentiment: sentiment.into(),
            platform: platform.into(),
            country: "USA".into(),
            hashtags: hashtags.into(),
            hour,
            likes,
            retweets: likes / 2.0,
        }
    }

    fn all(ds: &PostDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn ranking_breaks_ties_by_first_seen() {
        let ranked = rank_first_seen(["b", "a", "c", "a", "c", "d"]);
        assert_eq!(
            ranked,
            [
                ("a".to_string(), 2),
                ("c".to_string(), 2),
                ("b".to_string(), 1),
                ("d".to_string(), 1)
            ]
        );
    }

    #[test]
    fn top_hashtags_are_deterministic() {
        let ds = PostDataset::from_posts(
            vec![
                post("Positive", "Twitter", "#z #y", 1, 1.0),
                post("Positive", "Twitter", "#x #y", 1, 1.0),
                post("Positive", "Twitter", "#x #z", 1, 1.0),
                post("Positive", "Twitter", "#w", 1, 1.0),
            ],
            LoadReport::default(),
        );
        let idx = all(&ds);
        let top = top_hashtags(View::new(&ds, &idx), 3);
        assert_eq!(
            top,
            [("#z".to_string(), 2), ("#y".to_string(), 2), ("#x".to_string(), 2)]
        );
        assert_eq!(top_hashtags(View::new(&ds, &idx), 10).len(), 4);
    }

    #[test]
    fn single_sentiment_is_a_full_share() {
        let ds = PostDataset::from_posts(
            vec![
                post("Positive", "Twitter", "", 1, 1.0),
                post("Negative", "Twitter", "", 1, 1.0),
                post("Positive", "Twitter", "", 1, 1.0),
            ],
            LoadReport::default(),
        );
        let idx = vec![0, 2];
        let dash = Dashboard::compute(View::new(&ds, &idx), 10);
        assert_eq!(dash.summary.total, 2);
        assert_eq!(
            dash.sentiment_shares,
            [Slice {
                label: "Positive".into(),
                count: 2,
                share: 1.0
            }]
        );
    }

    #[test]
    fn peak_hour_counts() {
        let ds = PostDataset::from_posts(
            vec![
                post("A", "T", "", 5, 0.0),
                post("A", "T", "", 5, 0.0),
                post("A", "T", "", 23, 0.0),
                post("A", "T", "", 0, 0.0),
            ],
            LoadReport::default(),
        );
        let idx = all(&ds);
        let dash = Dashboard::compute(View::new(&ds, &idx), 10);
        assert_eq!(dash.hour_counts, [(0, 1), (5, 2), (23, 1)]);
        let peak = dash.hour_counts.iter().max_by_key(|(_, c)| *c).unwrap();
        assert_eq!(*peak, (5, 2));
    }

    #[test]
    fn empty_view_degrades_to_no_data() {
        let ds = PostDataset::from_posts(Vec::new(), LoadReport::default());
        let dash = Dashboard::compute(View::new(&ds, &[]), 10);
        assert_eq!(
            dash.summary,
            Summary {
                total: 0,
                avg_likes: None,
                avg_retweets: None
            }
        );
        assert!(dash.sentiment_shares.is_empty());
        assert!(dash.likes_by_sentiment.is_empty());
        assert!(dash.platform_sentiment.is_empty());
        assert!(dash.hour_counts.is_empty());
        assert!(dash.top_countries.is_empty());
        assert!(dash.top_hashtags.is_empty());
        assert_eq!(dash.correlation, None);
    }

    #[test]
    fn means_over_view() {
        let ds = PostDataset::from_posts(
            vec![post("A", "T", "", 1, 10.0), post("B", "T", "", 1, 20.0)],
            LoadReport::default(),
        );
        let idx = all(&ds);
        let summary = Summary::compute(View::new(&ds, &idx));
        assert_eq!(summary.avg_likes, Some(15.0));
        assert_eq!(summary.avg_retweets, Some(7.5));
    }

    #[test]
    fn crosstab_is_sorted_and_zero_filled() {
        let ds = PostDataset::from_posts(
            vec![
                post("Positive", "Twitter", "", 1, 0.0),
                post("Negative", "Instagram", "", 1, 0.0),
                post("Positive", "Twitter", "", 1, 0.0),
            ],
            LoadReport::default(),
        );
        let idx = all(&ds);
        let tab = CrossTab::compute(View::new(&ds, &idx));
        assert_eq!(tab.platforms, ["Instagram", "Twitter"]);
        assert_eq!(tab.sentiments, ["Negative", "Positive"]);
        assert_eq!(tab.counts, [vec![1usize, 0], vec![0, 2]]);
        assert_eq!(tab.series(1).collect::<Vec<_>>(), [0, 2]);
    }

    #[test]
    fn correlation_matrix_shape() {
        let ds = PostDataset::from_posts(
            vec![
                post("A", "T", "", 3, 1.0),
                post("A", "T", "", 3, 2.0),
                post("A", "T", "", 3, 3.0),
            ],
            LoadReport::default(),
        );
        let idx = all(&ds);
        let m = CorrelationMatrix::compute(View::new(&ds, &idx)).unwrap();
        for i in 0..3 {
            assert_eq!(m.values[i][i], Some(1.0));
        }
        // retweets are likes / 2
        assert!((m.values[0][1].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(m.values[0][1], m.values[1][0]);
        // constant hour column
        assert_eq!(m.values[0][2], None);
        assert_eq!(m.values[2][1], None);

        let one = vec![0];
        assert_eq!(CorrelationMatrix::compute(View::new(&ds, &one)), None);
    }

    #[test]
    fn likes_boxes_follow_first_seen_sentiment() {
        let ds = PostDataset::from_posts(
            vec![
                post("Neutral", "T", "", 1, 4.0),
                post("Joy", "T", "", 1, 10.0),
                post("Neutral", "T", "", 1, 6.0),
            ],
            LoadReport::default(),
        );
        let idx = all(&ds);
        let boxes = likes_by_sentiment(View::new(&ds, &idx));
        let labels: Vec<&str> = boxes.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(labels, ["Neutral", "Joy"]);
        assert_eq!(boxes[0].1.median, 5.0);
    }
}
