use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct OteViewerApp {
    pub state: AppState,
}

impl OteViewerApp {
    /// Start with the tables found in `dir` already loaded.
    pub fn with_data_dir(dir: &std::path::Path) -> Self {
        let mut app = Self::default();
        app.state.open_dir(dir);
        app
    }
}

impl eframe::App for OteViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::benchmark_plot(ui, &self.state);
        });
    }
}
