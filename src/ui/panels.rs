use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::active_filter_count;
use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Dashboard Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => Arc::clone(ds),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Widgets read `state` while drawing; clicks are applied afterwards.
    let mut toggled: Vec<(Dimension, String)> = Vec::new();
    let mut cleared: Vec<Dimension> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match active_filter_count(&state.filters) {
                0 => ui.label("Nothing selected means everything is shown."),
                n => ui.label(format!("{n} active filter(s), combined with AND.")),
            };
            ui.add_space(4.0);

            for dim in Dimension::ALL {
                let options = dataset.options(dim);
                let n_selected = state.filters.get(&dim).map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("Select {dim}  (all)")
                } else {
                    format!("Select {dim}  ({n_selected}/{})", options.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(dim == Dimension::Sentiment)
                    .show(ui, |ui: &mut Ui| {
                        if ui
                            .add_enabled(n_selected > 0, egui::Button::new("Clear").small())
                            .clicked()
                        {
                            cleared.push(dim);
                        }

                        for value in options {
                            let label = if value.is_empty() { "<blank>" } else { value.as_str() };
                            let mut text = RichText::new(label);
                            if dim == Dimension::Sentiment {
                                text = text.color(state.sentiment_colors.color_for(value));
                            }
                            let mut checked = state.is_selected(dim, value);
                            if ui.checkbox(&mut checked, text).changed() {
                                toggled.push((dim, value.clone()));
                            }
                        }
                    });
            }
        });

    for dim in cleared {
        state.clear_filter(dim);
    }
    for (dim, value) in toggled {
        state.toggle_filter_value(dim, &value);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} posts loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ))
            .on_hover_text(ds.report.source.display().to_string());

            let notes = ds.report.notes();
            if !notes.is_empty() {
                ui.separator();
                ui.label(RichText::new(notes.join(" · ")).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open post dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
