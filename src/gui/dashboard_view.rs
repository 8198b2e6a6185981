//! Dashboard View Widget
//! Central panel with the snapshot cards, trend charts, top-emitters table
//! and bubble chart for the current selection.

use crate::charts::{ChartPlotter, COUNTRY_TREND_COLOR, GLOBAL_TREND_COLOR};
use crate::views::{format_number, BubblePoint, RankedCountry, Snapshot, ViewMode};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 12.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SHARE_COLOR: Color32 = Color32::from_rgb(247, 129, 102);

/// Derived views computed for one selection.
pub struct DashboardData {
    pub snapshot: Snapshot,
    pub country_trend: Vec<[f64; 2]>,
    pub global_trend: Vec<[f64; 2]>,
    pub top_emitters: Vec<RankedCountry>,
    pub bubbles: Vec<BubblePoint>,
    pub mode: ViewMode,
}

/// Central dashboard area. Holds the views computed for the most recent
/// selection, or an error state when the cleaned dataset is unavailable.
#[derive(Default)]
pub struct DashboardView {
    pub data: Option<DashboardData>,
    pub error: Option<String>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.error = None;
        self.data = Some(data);
    }

    pub fn set_error(&mut self, message: String) {
        self.data = None;
        self.error = Some(message);
    }

    /// Draw the dashboard.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = &self.error {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(error).size(16.0).color(ERROR_COLOR));
            });
            return;
        }

        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_snapshot_cards(ui, &data.snapshot);
                ui.add_space(CARD_SPACING);

                Self::section_label(ui, "Emissions Trends");
                let chart_width = (ui.available_width() - CARD_SPACING) / 2.0;
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(chart_width);
                        ui.label(
                            RichText::new(&data.snapshot.country)
                                .size(14.0)
                                .strong(),
                        );
                        ChartPlotter::draw_trend_chart(
                            ui,
                            "country",
                            &data.country_trend,
                            COUNTRY_TREND_COLOR,
                        );
                    });
                    ui.add_space(CARD_SPACING);
                    ui.vertical(|ui| {
                        ui.set_width(chart_width);
                        ui.label(RichText::new("Global").size(14.0).strong());
                        ChartPlotter::draw_trend_chart(
                            ui,
                            "global",
                            &data.global_trend,
                            GLOBAL_TREND_COLOR,
                        );
                    });
                });

                ui.add_space(CARD_SPACING);

                Self::section_label(
                    ui,
                    &format!("Top 10 Emitters — {}", data.snapshot.year),
                );
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(ui.available_width() * 0.38);
                        if data.top_emitters.is_empty() {
                            ui.label(
                                RichText::new("No emitters recorded for this year")
                                    .size(12.0)
                                    .color(Color32::GRAY),
                            );
                        } else {
                            ChartPlotter::draw_top_table(ui, &data.top_emitters, data.mode);
                        }
                    });
                    ui.add_space(CARD_SPACING);
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("Population vs Area — size & colour = annual CO2")
                                .size(12.0)
                                .color(Color32::GRAY),
                        );
                        ChartPlotter::draw_bubble_chart(ui, &data.bubbles);
                    });
                });
            });
    }

    fn draw_snapshot_cards(ui: &mut egui::Ui, snapshot: &Snapshot) {
        Self::section_label(ui, &format!("Snapshot — {}", snapshot.year));

        let card_width = (ui.available_width() - 2.0 * CARD_SPACING) / 3.0;
        ui.horizontal(|ui| {
            Self::metric_card(
                ui,
                card_width,
                "Global CO2",
                &format_number(snapshot.global_total, 0),
                "metric tons total",
                GLOBAL_TREND_COLOR,
            );
            ui.add_space(CARD_SPACING);
            Self::metric_card(
                ui,
                card_width,
                &snapshot.country,
                &format_number(snapshot.country_total, 0),
                "metric tons",
                COUNTRY_TREND_COLOR,
            );
            ui.add_space(CARD_SPACING);
            Self::metric_card(
                ui,
                card_width,
                "Country Share",
                &snapshot.share_label(),
                "of global emissions",
                SHARE_COLOR,
            );
        });
    }

    fn metric_card(
        ui: &mut egui::Ui,
        width: f32,
        label: &str,
        value: &str,
        sub: &str,
        accent: Color32,
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, accent.gamma_multiply(0.6)))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(width);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(label.to_uppercase())
                            .size(10.0)
                            .color(Color32::GRAY),
                    );
                    ui.label(RichText::new(value).size(22.0).strong().color(accent));
                    ui.label(RichText::new(sub).size(10.0).color(Color32::GRAY));
                });
            });
    }

    fn section_label(ui: &mut egui::Ui, text: &str) {
        ui.add_space(4.0);
        ui.label(RichText::new(text).size(16.0).strong());
        ui.separator();
    }
}
