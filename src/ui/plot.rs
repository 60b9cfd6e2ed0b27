use std::ops::RangeInclusive;

use eframe::egui::{Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridInput, GridMark, Legend,
    Line, MarkerShape, Plot, PlotPoints, Points,
};

use crate::color::{series_color, ColorMap, ACCENT};
use crate::data::aggregate::{CrossTab, View};
use crate::data::stats::BoxSummary;

use super::no_data;

const PLOT_HEIGHT: f32 = 320.0;

/// Shared settings of every dashboard chart.
macro_rules! dashboard_plot {
    ($id:expr) => {
        Plot::new($id)
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_zoom(true)
    };
}

/// Names categories placed at integer x positions `0..labels.len()`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

/// Grid lines only at whole category positions.
fn category_spacer() -> impl Fn(GridInput) -> Vec<GridMark> {
    uniform_grid_spacer(|_| [1.0, 5.0, 10.0])
}

// ---------------------------------------------------------------------------
// Sentiment Insights tab
// ---------------------------------------------------------------------------

/// Box plot of Likes, one box per sentiment.
pub fn likes_box_plot(ui: &mut Ui, boxes: &[(String, BoxSummary)], colors: &ColorMap) {
    if boxes.is_empty() {
        no_data(ui, "No data for box plot.");
        return;
    }
    let labels: Vec<String> = boxes.iter().map(|(s, _)| s.clone()).collect();

    dashboard_plot!("likes_box")
        .x_grid_spacer(category_spacer())
        .x_axis_formatter(category_formatter(labels))
        .x_axis_label("Sentiment")
        .y_axis_label("Likes")
        .show(ui, |plot_ui| {
            for (i, (sentiment, b)) in boxes.iter().enumerate() {
                let color = colors.color_for(sentiment);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(sentiment)
                .box_width(0.5)
                .whisker_width(0.3)
                .fill(color.gamma_multiply(0.6))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(sentiment).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Platform & Engagement tab
// ---------------------------------------------------------------------------

/// Stacked bars: one bar per platform, one stacked series per sentiment.
pub fn platform_sentiment_bars(ui: &mut Ui, tab: &CrossTab, colors: &ColorMap) {
    if tab.is_empty() {
        no_data(ui, "No platform data to display.");
        return;
    }

    dashboard_plot!("platform_sentiment")
        .x_grid_spacer(category_spacer())
        .x_axis_formatter(category_formatter(tab.platforms.clone()))
        .x_axis_label("Platform")
        .y_axis_label("Number of Posts")
        .show(ui, |plot_ui| {
            let mut stacked: Vec<BarChart> = Vec::with_capacity(tab.sentiments.len());
            for (s, sentiment) in tab.sentiments.iter().enumerate() {
                let color = colors.color_for(sentiment);
                let bars: Vec<Bar> = tab
                    .series(s)
                    .enumerate()
                    .map(|(p, count)| {
                        Bar::new(p as f64, count as f64)
                            .name(format!("{} / {sentiment}", tab.platforms[p]))
                            .fill(color)
                    })
                    .collect();
                let below: Vec<&BarChart> = stacked.iter().collect();
                let chart = BarChart::new(bars)
                    .name(sentiment)
                    .color(color)
                    .width(0.6)
                    .stack_on(&below);
                stacked.push(chart);
            }
            for chart in stacked {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Retweets vs Likes, one marker per post, sized by Likes and coloured by
/// sentiment.  Hovering shows platform and country.
pub fn engagement_scatter(ui: &mut Ui, view: View<'_>, colors: &ColorMap) {
    if view.is_empty() {
        no_data(ui, "No data for scatter plot.");
        return;
    }
    let max_likes = view.iter().map(|p| p.likes).fold(0.0_f64, f64::max);
    let details: Vec<([f64; 2], String)> = view
        .iter()
        .map(|p| ([p.retweets, p.likes], format!("{} · {}", p.platform, p.country)))
        .collect();

    dashboard_plot!("engagement_scatter")
        .x_axis_label("Retweets")
        .y_axis_label("Likes")
        .label_formatter(move |name, value| {
            let place = details
                .iter()
                .find(|(xy, _)| xy[0] == value.x && xy[1] == value.y)
                .map(|(_, d)| d.as_str())
                .unwrap_or("");
            format!("{name}\nRetweets: {:.0}\nLikes: {:.0}\n{place}", value.x, value.y)
        })
        .show(ui, |plot_ui| {
            for post in view.iter() {
                let scale = if max_likes > 0.0 {
                    (post.likes.max(0.0) / max_likes).sqrt()
                } else {
                    0.0
                };
                let points = Points::new(vec![[post.retweets, post.likes]])
                    .name(&post.sentiment)
                    .color(colors.color_for(&post.sentiment))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(2.5 + 9.0 * scale as f32);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Temporal Analysis / Advanced Correlations tabs
// ---------------------------------------------------------------------------

/// Posts per hour of day.
pub fn hourly_activity_line(ui: &mut Ui, hours: &[(i64, usize)]) {
    if hours.is_empty() {
        no_data(ui, "No hourly data available.");
        return;
    }
    let points: PlotPoints = hours
        .iter()
        .map(|&(hour, count)| [hour as f64, count as f64])
        .collect();

    dashboard_plot!("hourly_activity")
        .x_axis_label("Hour")
        .y_axis_label("Number of Posts")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Posts").color(ACCENT).width(2.0));
        });
}

/// Vertical bars for a ranked (label, count) list.
pub fn ranking_bars(
    ui: &mut Ui,
    id: &str,
    ranking: &[(String, usize)],
    axis_labels: (&str, &str),
    empty_message: &str,
) {
    if ranking.is_empty() {
        no_data(ui, empty_message);
        return;
    }
    let labels: Vec<String> = ranking.iter().map(|(l, _)| l.clone()).collect();
    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .fill(series_color(i))
                .width(0.7)
        })
        .collect();

    dashboard_plot!(id)
        .x_grid_spacer(category_spacer())
        .x_axis_formatter(category_formatter(labels))
        .x_axis_label(axis_labels.0)
        .y_axis_label(axis_labels.1)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(axis_labels.1));
        });
}
