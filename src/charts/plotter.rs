//! Chart Plotter Module
//! Creates the dashboard visualizations using egui_plot.

use crate::views::{format_compact, format_number, BubblePoint, RankedCountry, ViewMode};
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints, Points};

/// Accent for the selected-country trend.
pub const COUNTRY_TREND_COLOR: Color32 = Color32::from_rgb(88, 166, 255); // Blue

/// Accent for the global trend.
pub const GLOBAL_TREND_COLOR: Color32 = Color32::from_rgb(63, 185, 80); // Green

/// Bubble radius for the largest annual value in view.
const MAX_BUBBLE_RADIUS: f32 = 18.0;
const MIN_BUBBLE_RADIUS: f32 = 2.0;

const TREND_HEIGHT: f32 = 260.0;
const BUBBLE_HEIGHT: f32 = 330.0;

/// Renders the dashboard charts and tables.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Yellow -> red heat ramp over `t` in [0, 1].
    pub fn heat_color(t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let r = 255.0 + (189.0 - 255.0) * t;
        let g = 237.0 * (1.0 - t);
        let b = 160.0 + (38.0 - 160.0) * t;
        Color32::from_rgb(r as u8, g as u8, b as u8)
    }

    /// Line chart of (year, value) points with an area fill to zero.
    pub fn draw_trend_chart(ui: &mut egui::Ui, id: &str, points: &[[f64; 2]], color: Color32) {
        Plot::new(format!("trend_{id}"))
            .height(TREND_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Annual CO2")
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .y_axis_formatter(|mark, _range| format_compact(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(color)
                        .width(2.0)
                        .fill(0.0),
                );
            });
    }

    /// Population vs area scatter on log-log axes; marker radius and colour
    /// both scale with the annual delta, the maximum value mapping to
    /// `MAX_BUBBLE_RADIUS`.
    pub fn draw_bubble_chart(ui: &mut egui::Ui, points: &[BubblePoint]) {
        let max_annual = points
            .iter()
            .map(|point| point.annual_co2)
            .fold(0.0_f64, f64::max);

        Plot::new("bubble_population_area")
            .height(BUBBLE_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Population (log)")
            .y_axis_label("Area km2 (log)")
            .x_axis_formatter(|mark, _range| format_compact(10_f64.powf(mark.value)))
            .y_axis_formatter(|mark, _range| format_compact(10_f64.powf(mark.value)))
            .show(ui, |plot_ui| {
                for point in points {
                    let weight = if max_annual > 0.0 {
                        (point.annual_co2 / max_annual).max(0.0) as f32
                    } else {
                        0.0
                    };
                    let radius =
                        MIN_BUBBLE_RADIUS + (MAX_BUBBLE_RADIUS - MIN_BUBBLE_RADIUS) * weight;

                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[
                            point.population.log10(),
                            point.area_km2.log10(),
                        ]]))
                        .radius(radius)
                        .color(Self::heat_color(weight).gamma_multiply(0.8))
                        .name(&point.country),
                    );
                }
            });
    }

    /// Striped top-emitters table.
    pub fn draw_top_table(ui: &mut egui::Ui, ranked: &[RankedCountry], mode: ViewMode) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("top_emitters_table")
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong().size(12.0));
                        ui.label(RichText::new("Country").strong().size(12.0));
                        ui.label(RichText::new(mode.value_label()).strong().size(12.0));
                        ui.end_row();

                        for (i, entry) in ranked.iter().enumerate() {
                            ui.label(RichText::new((i + 1).to_string()).size(12.0));
                            ui.label(RichText::new(&entry.country).size(12.0));
                            ui.label(RichText::new(format_number(entry.value, 2)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
