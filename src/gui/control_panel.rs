//! Control Panel Widget
//! Left side panel with the dashboard selection controls.

use crate::views::ViewMode;
use egui::{Color32, ComboBox, RichText};

/// Current dashboard selection.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub year: i64,
    pub country: String,
    pub mode: ViewMode,
}

/// Left side control panel with year, country and view-mode selection.
pub struct ControlPanel {
    pub selection: Selection,
    pub year_bounds: (i64, i64),
    pub countries: Vec<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            year_bounds: (0, 0),
            countries: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the controls from a freshly loaded snapshot. The year resets to
    /// the most recent one observed.
    pub fn update_domains(
        &mut self,
        year_bounds: (i64, i64),
        countries: Vec<String>,
        default_country: Option<&str>,
    ) {
        self.year_bounds = year_bounds;
        self.selection.year = year_bounds.1;
        if let Some(country) = default_country {
            if !countries.iter().any(|c| c == &self.selection.country) {
                self.selection.country = country.to_string();
            }
        }
        self.countries = countries;
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 CarbonScope")
                    .size(22.0)
                    .color(Color32::from_rgb(63, 185, 80)),
            );
            ui.label(
                RichText::new("Global CO2 Emissions")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Selection Section =====
        ui.label(RichText::new("⚙ Controls").size(14.0).strong());
        ui.add_space(8.0);

        let (min_year, max_year) = self.year_bounds;
        ui.horizontal(|ui| {
            ui.add_sized([70.0, 20.0], egui::Label::new("Year:"));
            let slider = egui::Slider::new(&mut self.selection.year, min_year..=max_year);
            if ui.add(slider).changed() {
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([70.0, 20.0], egui::Label::new("Country:"));
            ComboBox::from_id_salt("country")
                .width(170.0)
                .selected_text(&self.selection.country)
                .show_ui(ui, |ui| {
                    for country in &self.countries {
                        if ui
                            .selectable_label(self.selection.country == *country, country)
                            .clicked()
                        {
                            self.selection.country = country.clone();
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(10.0);

        ui.label("View Mode:");
        ui.horizontal(|ui| {
            for mode in [ViewMode::TotalEmissions, ViewMode::PerCapita] {
                if ui
                    .radio_value(&mut self.selection.mode, mode, mode.label())
                    .changed()
                {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Actions =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("⟳ Reload Data").size(14.0))
                .min_size(egui::vec2(160.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Reload;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Status =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set the status line.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by the control panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    Reload,
}
