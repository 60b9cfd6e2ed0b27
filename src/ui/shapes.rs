use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui};

use crate::color::{diverging, text_on, ColorMap};
use crate::data::aggregate::{CorrelationMatrix, Slice, NUMERIC_FIELDS};

use super::no_data;

// ---------------------------------------------------------------------------
// Donut chart (painter-drawn, egui_plot has no pie)
// ---------------------------------------------------------------------------

const DONUT_HEIGHT: f32 = 300.0;
/// Inner radius as a fraction of the outer one.
const DONUT_HOLE: f32 = 0.3;
/// Segments per full turn; each segment is a convex quad.
const DONUT_RESOLUTION: f32 = 180.0;

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * egui::vec2(angle.cos(), angle.sin())
}

/// Share of each sentiment, with percent and label printed on the ring.
pub fn sentiment_donut(ui: &mut Ui, slices: &[Slice], colors: &ColorMap) {
    if slices.is_empty() {
        no_data(ui, "No sentiment data to display.");
        return;
    }

    let size = egui::vec2(ui.available_width(), DONUT_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let outer = 0.45 * rect.width().min(rect.height());
    let inner = outer * DONUT_HOLE;

    let mut start = -FRAC_PI_2;
    for slice in slices {
        let color = colors.color_for(&slice.label);
        let sweep = slice.share as f32 * TAU;
        let steps = ((sweep / TAU) * DONUT_RESOLUTION).ceil().max(1.0) as usize;
        for k in 0..steps {
            let a0 = start + sweep * k as f32 / steps as f32;
            let a1 = start + sweep * (k + 1) as f32 / steps as f32;
            let quad = vec![
                polar(center, inner, a0),
                polar(center, outer, a0),
                polar(center, outer, a1),
                polar(center, inner, a1),
            ];
            // Stroke in the fill colour hides seams between segments.
            painter.add(Shape::convex_polygon(quad, color, Stroke::new(0.5, color)));
        }

        // Labels inside the ring, skipped when the wedge is too thin to fit.
        if slice.share >= 0.04 {
            let mid = start + sweep / 2.0;
            painter.text(
                polar(center, (inner + outer) / 2.0, mid),
                Align2::CENTER_CENTER,
                format!("{}\n{:.1}%", slice.label, slice.share * 100.0),
                FontId::proportional(12.0),
                text_on(color),
            );
        }
        start += sweep;
    }

    if response.hovered() {
        if let Some(pos) = response.hover_pos() {
            if let Some(slice) = slice_at(slices, center, inner, outer, pos) {
                response.on_hover_text(format!(
                    "{}: {} posts ({:.1}%)",
                    slice.label,
                    slice.count,
                    slice.share * 100.0
                ));
            }
        }
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for slice in slices {
            let color = colors.color_for(&slice.label);
            ui.label(RichText::new("■").color(color));
            ui.label(format!("{} ({})", slice.label, slice.count));
        }
    });
}

/// The slice under `pos`, if it lies on the ring.
fn slice_at<'s>(slices: &'s [Slice], center: Pos2, inner: f32, outer: f32, pos: Pos2) -> Option<&'s Slice> {
    let d = pos - center;
    let r = d.length();
    if r < inner || r > outer {
        return None;
    }
    // Angle measured clockwise from twelve o'clock, in turns.
    let turns = ((d.y.atan2(d.x) + FRAC_PI_2).rem_euclid(TAU)) / TAU;
    let mut acc = 0.0;
    for slice in slices {
        acc += slice.share as f32;
        if turns <= acc {
            return Some(slice);
        }
    }
    slices.last()
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const LABEL_MARGIN: f32 = 70.0;
const SCALE_WIDTH: f32 = 16.0;
const SCALE_STEPS: usize = 40;

/// 3×3 grid coloured on a diverging blue-white-red scale, coefficients
/// printed in each cell, with a colour scale bar on the right.
pub fn correlation_heatmap(ui: &mut Ui, matrix: Option<&CorrelationMatrix>) {
    let Some(matrix) = matrix else {
        no_data(ui, "Not enough data for correlation heatmap.");
        return;
    };

    let width = ui.available_width();
    let side = (width - LABEL_MARGIN - SCALE_WIDTH - 40.0).clamp(120.0, 320.0);
    let (response, painter) =
        ui.allocate_painter(egui::vec2(width, side + LABEL_MARGIN / 2.0), Sense::hover());
    let origin = response.rect.min + egui::vec2(LABEL_MARGIN, 0.0);
    let cell = side / NUMERIC_FIELDS.len() as f32;
    let text_color = ui.visuals().text_color();

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let min = origin + egui::vec2(j as f32 * cell, i as f32 * cell);
            let cell_rect = Rect::from_min_size(min, egui::vec2(cell, cell)).shrink(1.0);
            let (fill, text) = match value {
                Some(r) => (diverging(*r), format!("{r:.2}")),
                None => (Color32::from_gray(160), "n/a".to_string()),
            };
            painter.rect_filled(cell_rect, 0.0, fill);
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(13.0),
                text_on(fill),
            );
        }
    }

    for (k, name) in NUMERIC_FIELDS.iter().enumerate() {
        let offset = (k as f32 + 0.5) * cell;
        painter.text(
            origin + egui::vec2(-6.0, offset),
            Align2::RIGHT_CENTER,
            *name,
            FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            origin + egui::vec2(offset, side + 4.0),
            Align2::CENTER_TOP,
            *name,
            FontId::proportional(12.0),
            text_color,
        );
    }

    // Scale bar: +1 at the top, -1 at the bottom.
    let bar_min = origin + egui::vec2(side + 16.0, 0.0);
    let step_h = side / SCALE_STEPS as f32;
    for s in 0..SCALE_STEPS {
        let value = 1.0 - 2.0 * (s as f64 + 0.5) / SCALE_STEPS as f64;
        let r = Rect::from_min_size(
            bar_min + egui::vec2(0.0, s as f32 * step_h),
            egui::vec2(SCALE_WIDTH, step_h + 0.5),
        );
        painter.rect_filled(r, 0.0, diverging(value));
    }
    for (label, y) in [("1", 0.0), ("0", side / 2.0), ("-1", side)] {
        painter.text(
            bar_min + egui::vec2(SCALE_WIDTH + 4.0, y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(11.0),
            text_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices() -> Vec<Slice> {
        vec![
            Slice {
                label: "Positive".into(),
                count: 3,
                share: 0.75,
            },
            Slice {
                label: "Negative".into(),
                count: 1,
                share: 0.25,
            },
        ]
    }

    #[test]
    fn hit_testing_follows_clockwise_order() {
        let s = slices();
        let c = Pos2::new(100.0, 100.0);
        // Right of centre is a quarter turn: inside the first slice.
        let hit = slice_at(&s, c, 10.0, 50.0, Pos2::new(130.0, 100.0));
        assert_eq!(hit.map(|s| s.label.as_str()), Some("Positive"));
        // Left of centre, just above the horizontal: last quarter.
        let hit = slice_at(&s, c, 10.0, 50.0, Pos2::new(70.0, 99.0));
        assert_eq!(hit.map(|s| s.label.as_str()), Some("Negative"));
    }

    #[test]
    fn hole_and_outside_miss() {
        let s = slices();
        let c = Pos2::new(0.0, 0.0);
        assert!(slice_at(&s, c, 10.0, 50.0, Pos2::new(2.0, 2.0)).is_none());
        assert!(slice_at(&s, c, 10.0, 50.0, Pos2::new(80.0, 0.0)).is_none());
    }
}
