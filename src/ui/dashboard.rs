use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ACCENT;
use crate::data::aggregate::{CrossTab, Summary};
use crate::state::{AppState, Tab};

use super::{plot, shapes};

// ---------------------------------------------------------------------------
// Central panel: metrics, tabs, charts
// ---------------------------------------------------------------------------

/// Render the dashboard body.  Without a dataset only the load error (or a
/// hint) is shown.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => {
                ui.label(RichText::new(msg).color(Color32::RED).heading());
            }
            None => {
                ui.heading("Open a dataset to begin  (File → Open…)");
            }
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("📊 Sentiment Analysis Dashboard").size(26.0));
            ui.add_space(8.0);

            if let Some(dash) = &state.dashboard {
                metric_cards(ui, &dash.summary);
            }
            ui.add_space(8.0);

            ui.horizontal(|ui: &mut Ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut state.active_tab, tab, tab.title());
                }
            });
            ui.separator();

            render_tab(ui, state);

            ui.add_space(12.0);
            ui.separator();
            ui.label(RichText::new("📊 Sentiment Analysis Dashboard | Built with egui").weak());
        });
}

fn render_tab(ui: &mut Ui, state: &AppState) {
    let (Some(dash), Some(view)) = (&state.dashboard, state.view()) else {
        return;
    };
    let colors = &state.sentiment_colors;

    match state.active_tab {
        Tab::SentimentInsights => {
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].strong("Sentiment Distribution");
                shapes::sentiment_donut(&mut cols[0], &dash.sentiment_shares, colors);
                cols[1].strong("Engagement by Sentiment");
                plot::likes_box_plot(&mut cols[1], &dash.likes_by_sentiment, colors);
            });
        }
        Tab::PlatformEngagement => {
            ui.strong("Platform Performance");
            plot::platform_sentiment_bars(ui, &dash.platform_sentiment, colors);
            crosstab_table(ui, &dash.platform_sentiment);
            ui.add_space(12.0);
            ui.strong("Retweets vs Likes");
            plot::engagement_scatter(ui, view, colors);
        }
        Tab::TemporalAnalysis => {
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].strong("Peak Posting Hours");
                plot::hourly_activity_line(&mut cols[0], &dash.hour_counts);
                cols[1].strong(format!("Top {} Countries", state.config.top_n));
                plot::ranking_bars(
                    &mut cols[1],
                    "top_countries",
                    &dash.top_countries,
                    ("Country", "Number of Posts"),
                    "No country data to display.",
                );
            });
        }
        Tab::AdvancedCorrelations => {
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].strong(format!("Top {} Hashtags", state.config.top_n));
                plot::ranking_bars(
                    &mut cols[0],
                    "top_hashtags",
                    &dash.top_hashtags,
                    ("Hashtag", "Frequency"),
                    "No hashtags found.",
                );
                cols[1].strong("Correlation Heatmap");
                shapes::correlation_heatmap(&mut cols[1], dash.correlation.as_ref());
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Two decimals, or "no data" for an undefined mean.
pub fn format_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| format!("{v:.2}"))
}

/// Post count, flagged when the view is empty.
pub fn format_total(total: usize) -> String {
    if total == 0 {
        "0 (no data)".to_string()
    } else {
        total.to_string()
    }
}

fn metric_cards(ui: &mut Ui, summary: &Summary) {
    let cards = [
        ("🔢 Total Posts", format_total(summary.total)),
        ("👍 Avg Likes", format_mean(summary.avg_likes)),
        ("🔁 Avg Retweets", format_mean(summary.avg_retweets)),
    ];
    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style())
                .fill(col.visuals().faint_bg_color)
                .show(col, |ui: &mut Ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(title).color(ACCENT).strong());
                    ui.label(RichText::new(value).size(24.0));
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Cross-tab table under the platform chart
// ---------------------------------------------------------------------------

fn crosstab_table(ui: &mut Ui, tab: &CrossTab) {
    if tab.is_empty() {
        return;
    }
    egui::CollapsingHeader::new("Counts table")
        .id_salt("crosstab_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("crosstab")
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(90.0))
                .columns(Column::auto().at_least(60.0), tab.sentiments.len())
                .header(20.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("Platform");
                    });
                    for sentiment in &tab.sentiments {
                        header.col(|ui: &mut Ui| {
                            ui.strong(sentiment);
                        });
                    }
                })
                .body(|mut body| {
                    for (platform, counts) in tab.platforms.iter().zip(&tab.counts) {
                        body.row(18.0, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.label(platform);
                            });
                            for count in counts {
                                row.col(|ui: &mut Ui| {
                                    ui.label(count.to_string());
                                });
                            }
                        });
                    }
                });
        });
}
