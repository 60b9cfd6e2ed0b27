use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Column – the expected input columns
// ---------------------------------------------------------------------------

/// The columns the loader looks for, by exact (case-sensitive) header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Sentiment,
    Platform,
    Country,
    Hashtags,
    Hour,
    Likes,
    Retweets,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Sentiment,
        Column::Platform,
        Column::Country,
        Column::Hashtags,
        Column::Hour,
        Column::Likes,
        Column::Retweets,
    ];

    /// Header name as it appears in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Column::Sentiment => "Sentiment",
            Column::Platform => "Platform",
            Column::Country => "Country",
            Column::Hashtags => "Hashtags",
            Column::Hour => "Hour",
            Column::Likes => "Likes",
            Column::Retweets => "Retweets",
        }
    }

    pub fn from_header(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == name)
    }
}

/// Pandas writes the frame index as a column called `Unnamed: 0` (or with an
/// empty header), repeated saves stack up `Unnamed: 0.1` and so on.
pub fn is_index_column(name: &str) -> bool {
    name.trim().is_empty() || name.starts_with("Unnamed:")
}

// ---------------------------------------------------------------------------
// Dimension – the categorical columns a user can filter on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Platform,
    Sentiment,
    Country,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Platform, Dimension::Sentiment, Dimension::Country];

    /// Plural label used by the filter widgets.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Platform => "Platforms",
            Dimension::Sentiment => "Sentiments",
            Dimension::Country => "Countries",
        }
    }

    /// The field of `post` this dimension reads.
    pub fn value(self, post: &Post) -> &str {
        match self {
            Dimension::Platform => &post.platform,
            Dimension::Sentiment => &post.sentiment,
            Dimension::Country => &post.country,
        }
    }

    fn index(self) -> usize {
        match self {
            Dimension::Platform => 0,
            Dimension::Sentiment => 1,
            Dimension::Country => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Post – one row of the dataset
// ---------------------------------------------------------------------------

/// A single social-media post after type coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Post {
    pub sentiment: String,
    pub platform: String,
    pub country: String,
    /// Whitespace-delimited tags, kept verbatim.
    pub hashtags: String,
    /// Hour of day; 0 when the source cell was missing or not a number.
    pub hour: i64,
    pub likes: f64,
    pub retweets: f64,
}

impl Post {
    pub fn hashtag_tokens(&self) -> impl Iterator<Item = &str> {
        self.hashtags.split_whitespace()
    }
}

// ---------------------------------------------------------------------------
// LoadReport – what the loader had to paper over
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub source: PathBuf,
    /// Cells replaced by a default (unparseable numbers, nulls, blanks).
    pub coerced_cells: usize,
    /// Expected columns that were absent; every post got the default.
    pub missing_columns: Vec<Column>,
    /// Index artifacts that were discarded.
    pub dropped_columns: Vec<String>,
}

impl LoadReport {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Short human-readable notes for the status bar, empty when clean.
    pub fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if !self.missing_columns.is_empty() {
            let names: Vec<&str> = self.missing_columns.iter().map(|c| c.header()).collect();
            notes.push(format!("missing columns: {}", names.join(", ")));
        }
        if self.coerced_cells > 0 {
            notes.push(format!("{} cells defaulted", self.coerced_cells));
        }
        notes
    }
}

// ---------------------------------------------------------------------------
// PostDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded posts plus the distinct values of every filter dimension.
#[derive(Debug, Clone)]
pub struct PostDataset {
    pub posts: Vec<Post>,
    /// Per dimension, distinct values in first-seen order.
    options: [Vec<String>; 3],
    pub report: LoadReport,
}

impl PostDataset {
    /// Build dimension indices from the loaded posts.
    pub fn from_posts(posts: Vec<Post>, report: LoadReport) -> Self {
        let mut options: [Vec<String>; 3] = Default::default();
        for dim in Dimension::ALL {
            let mut seen: HashSet<&str> = HashSet::new();
            options[dim.index()] = posts
                .iter()
                .map(|p| dim.value(p))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();
        }
        PostDataset {
            posts,
            options,
            report,
        }
    }

    /// Distinct values of `dim`, in the order they first appear.
    pub fn options(&self, dim: Dimension) -> &[String] {
        &self.options[dim.index()]
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(sentiment: &str, platform: &str, country: &str) -> Post {
        Post {
            sentiment: sentiment.into(),
            platform: platform.into(),
            country: country.into(),
            ..Default::default()
        }
    }

    #[test]
    fn options_keep_first_seen_order() {
        let ds = PostDataset::from_posts(
            vec![
                post("Positive", "Twitter", "USA"),
                post("Negative", "Instagram", "UK"),
                post("Positive", "Facebook", "USA"),
                post("Neutral", "Twitter", "Canada"),
            ],
            LoadReport::default(),
        );
        assert_eq!(ds.options(Dimension::Sentiment), ["Positive", "Negative", "Neutral"]);
        assert_eq!(ds.options(Dimension::Platform), ["Twitter", "Instagram", "Facebook"]);
        assert_eq!(ds.options(Dimension::Country), ["USA", "UK", "Canada"]);
    }

    #[test]
    fn index_column_detection() {
        assert!(is_index_column("Unnamed: 0"));
        assert!(is_index_column("Unnamed: 0.1"));
        assert!(is_index_column(""));
        assert!(!is_index_column("Likes"));
        assert!(!is_index_column("unnamed"));
    }

    #[test]
    fn headers_are_case_sensitive() {
        assert_eq!(Column::from_header("Likes"), Some(Column::Likes));
        assert_eq!(Column::from_header("likes"), None);
    }

    #[test]
    fn hashtag_tokens_split_on_any_whitespace() {
        let p = Post {
            hashtags: " #Happy\t#Joy  #Happy ".into(),
            ..Default::default()
        };
        assert_eq!(p.hashtag_tokens().collect::<Vec<_>>(), ["#Happy", "#Joy", "#Happy"]);
    }

    #[test]
    fn report_notes_are_empty_when_clean() {
        assert!(LoadReport::new("x.csv").notes().is_empty());
        let report = LoadReport {
            coerced_cells: 3,
            missing_columns: vec![Column::Hashtags],
            ..LoadReport::new("x.csv")
        };
        assert_eq!(report.notes(), ["missing columns: Hashtags", "3 cells defaulted"]);
    }
}
