use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{Dashboard, View};
use crate::data::cache::LoadCache;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::{Dimension, PostDataset};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    SentimentInsights,
    PlatformEngagement,
    TemporalAnalysis,
    AdvancedCorrelations,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::SentimentInsights,
        Tab::PlatformEngagement,
        Tab::TemporalAnalysis,
        Tab::AdvancedCorrelations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::SentimentInsights => "Sentiment Insights",
            Tab::PlatformEngagement => "Platform & Engagement",
            Tab::TemporalAnalysis => "Temporal Analysis",
            Tab::AdvancedCorrelations => "Advanced Correlations",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Parsed datasets by path, kept for the whole session.
    cache: LoadCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<PostDataset>>,

    /// Per-dimension filter selections; empty means everything.
    pub filters: FilterState,

    /// Indices of posts passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregations over `visible_indices`, rebuilt on every filter change.
    pub dashboard: Option<Dashboard>,

    /// Colour per sentiment value, fixed for the dataset's lifetime.
    pub sentiment_colors: ColorMap,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: LoadCache::new(),
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            dashboard: None,
            sentiment_colors: ColorMap::default(),
            active_tab: Tab::default(),
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and make it current.
    /// On failure the dashboard is cleared and the error kept for display.
    pub fn open_path(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading data: {e}"));
                self.dataset = None;
                self.dashboard = None;
                self.visible_indices.clear();
            }
        }
    }

    /// Re-read the current file from disk, bypassing the cache.
    pub fn reload(&mut self) {
        let Some(path) = self.dataset.as_ref().map(|ds| ds.report.source.clone()) else {
            return;
        };
        self.cache.invalidate(&path);
        log::info!("Reloading {}", path.display());
        self.open_path(&path);
    }

    /// Ingest a newly loaded dataset: reset filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<PostDataset>) {
        self.filters = FilterState::default();
        self.sentiment_colors = ColorMap::new(dataset.options(Dimension::Sentiment));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and every aggregation after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.filters);
        let view = View::new(ds, &self.visible_indices);
        self.dashboard = Some(Dashboard::compute(view, self.config.top_n));
        log::debug!("{} of {} posts visible", self.visible_indices.len(), ds.len());
    }

    /// Borrowed view of the current filtered posts.
    pub fn view(&self) -> Option<View<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| View::new(ds, &self.visible_indices))
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        self.filters.get(&dim).is_some_and(|s| s.contains(value))
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        let selected = self.filters.entry(dim).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Empty a dimension's selection, which shows every value again.
    pub fn clear_filter(&mut self, dim: Dimension) {
        if let Some(selected) = self.filters.get_mut(&dim) {
            selected.clear();
        }
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Unnamed: 0,Sentiment,Platform,Country,Hashtags,Hour,Likes,Retweets").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn header_only_file_renders_no_data() {
        let file = csv_file("");
        let mut state = AppState::new(DashboardConfig::default());
        state.open_path(file.path());

        assert!(state.status_message.is_none());
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.summary.total, 0);
        assert_eq!(dash.summary.avg_likes, None);
        assert_eq!(dash.summary.avg_retweets, None);
        assert!(dash.sentiment_shares.is_empty());
        assert!(dash.correlation.is_none());
    }

    #[test]
    fn filter_toggling_recomputes_dashboard() {
        let file = csv_file(
            "0,Positive,Twitter,USA,#a,1,10,1\n\
             1,Negative,Twitter,UK,#b,2,20,2\n\
             2,Positive,Instagram,USA,#a,3,30,3\n",
        );
        let mut state = AppState::new(DashboardConfig::default());
        state.open_path(file.path());
        assert_eq!(state.visible_indices, [0, 1, 2]);

        state.toggle_filter_value(Dimension::Sentiment, "Positive");
        assert!(state.is_selected(Dimension::Sentiment, "Positive"));
        assert_eq!(state.visible_indices, [0, 2]);
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.sentiment_shares.len(), 1);
        assert_eq!(dash.sentiment_shares[0].label, "Positive");
        assert_eq!(dash.sentiment_shares[0].share, 1.0);
        assert_eq!(dash.summary.avg_likes, Some(20.0));

        // Deselecting the only value falls back to select-all.
        state.toggle_filter_value(Dimension::Sentiment, "Positive");
        assert_eq!(state.visible_indices, [0, 1, 2]);

        state.toggle_filter_value(Dimension::Country, "UK");
        assert_eq!(state.view().unwrap().len(), 1);
        state.clear_filter(Dimension::Country);
        assert_eq!(state.view().unwrap().len(), 3);
    }

    #[test]
    fn failed_load_clears_dashboard() {
        let file = csv_file("0,Positive,Twitter,USA,#a,1,10,1\n");
        let mut state = AppState::new(DashboardConfig::default());
        state.open_path(file.path());
        assert!(state.dashboard.is_some());

        state.open_path(Path::new("/no/such/file.csv"));
        assert!(state.dataset.is_none());
        assert!(state.dashboard.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error loading data:"));
    }

    #[test]
    fn reload_picks_up_changes() {
        let mut file = csv_file("0,Positive,Twitter,USA,#a,1,10,1\n");
        let mut state = AppState::new(DashboardConfig::default());
        state.open_path(file.path());

        writeln!(file, "1,Negative,Twitter,UK,#b,2,20,2").unwrap();
        file.flush().unwrap();
        state.open_path(file.path());
        assert_eq!(state.dataset.as_ref().unwrap().len(), 1);

        state.reload();
        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);
    }
}
