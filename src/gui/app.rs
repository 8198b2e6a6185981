//! CarbonScope Main Application
//! Main window with control panel and dashboard view.

use crate::data::{DatasetLoader, CLEANED_DATA_PATH};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardData, DashboardView};
use crate::views::Metrics;
use egui::SidePanel;

/// Main application window.
pub struct DashboardApp {
    loader: DatasetLoader,
    control_panel: ControlPanel,
    dashboard: DashboardView,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            loader: DatasetLoader::new(CLEANED_DATA_PATH),
            control_panel: ControlPanel::new(),
            dashboard: DashboardView::new(),
        };
        app.load_snapshot(false);
        app
    }

    /// Load (or explicitly reload) the cleaned dataset, reseed the controls
    /// and recompute the views.
    fn load_snapshot(&mut self, force: bool) {
        let result = if force {
            self.loader.reload()
        } else {
            self.loader.load()
        };

        match result {
            Ok(table) => {
                self.control_panel.update_domains(
                    table.year_bounds(),
                    table.countries().to_vec(),
                    table.default_country(),
                );
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} countries",
                    table.dataframe().height(),
                    table.countries().len()
                ));
                self.recompute();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load cleaned dataset");
                self.control_panel.set_status(&format!("Error: {e}"));
                self.dashboard
                    .set_error(format!("Failed to load cleaned dataset:\n{e}"));
            }
        }
    }

    /// Recompute every derived view for the current selection. The table is
    /// hundreds of rows, so this runs synchronously on the UI thread.
    fn recompute(&mut self) {
        let Some(table) = self.loader.snapshot().cloned() else {
            return;
        };
        let df = table.dataframe();
        let selection = &self.control_panel.selection;

        self.dashboard.set_data(DashboardData {
            snapshot: Metrics::snapshot(df, selection.year, &selection.country),
            country_trend: Metrics::country_trend(df, &selection.country),
            global_trend: Metrics::global_trend(df),
            top_emitters: Metrics::top_emitters(df, selection.year, selection.mode),
            bubbles: Metrics::bubble_points(df, selection.year),
            mode: selection.mode,
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Controls
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged => self.recompute(),
                        ControlPanelAction::Reload => self.load_snapshot(true),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
