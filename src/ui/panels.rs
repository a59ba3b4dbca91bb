use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::mean;
use crate::data::normalize::Divisor;
use crate::protocol::Protocol;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – series selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");
    ui.separator();

    if state.tables.is_empty() {
        ui.label("No measurements loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Protocols ----
            ui.strong("Protocols");
            let loaded: Vec<Protocol> = state.tables.iter().map(|(p, _)| *p).collect();
            for protocol in Protocol::ALL {
                let mut checked = state.selection.protocols.contains(&protocol);
                let load_error = state.load_error(protocol).map(str::to_owned);
                let text = if loaded.contains(&protocol) {
                    RichText::new(protocol.label())
                } else if load_error.is_some() {
                    RichText::new(format!("{}  (invalid file)", protocol.label()))
                        .color(Color32::RED)
                } else {
                    RichText::new(format!("{}  (no file)", protocol.label())).weak()
                };
                let mut response = ui.checkbox(&mut checked, text);
                if let Some(err) = load_error {
                    response = response.on_hover_text(err);
                }
                if response.changed() {
                    state.toggle_protocol(protocol);
                }
            }
            ui.separator();

            // ---- Security parameter ----
            ui.strong("Security parameter k");
            let current_k = state.selection.security_param;
            egui::ComboBox::from_id_salt("security_param")
                .selected_text(current_k.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for k in state.security_params() {
                        if ui.selectable_label(current_k == k, k.to_string()).clicked() {
                            state.set_security_param(k);
                        }
                    }
                });
            ui.separator();

            // ---- Normalization ----
            ui.strong("Values");
            let current_divisor = state.selection.divisor;
            for divisor in Divisor::ALL {
                if ui
                    .radio(current_divisor == divisor, divisor.label())
                    .clicked()
                {
                    state.set_divisor(divisor);
                }
            }
            let mut running = state.selection.running_mean;
            if ui.checkbox(&mut running, "Running mean").changed() {
                state.set_running_mean(running);
            }
            ui.separator();

            // ---- y ticks ----
            ui.strong("y tick step [s]");
            let mut step = state.axis.y_step;
            let speed = step * 0.05;
            let response = ui.add(
                egui::DragValue::new(&mut step)
                    .speed(speed)
                    .range(1e-12..=1e6)
                    .custom_formatter(|v, _| format!("{v:.3e}")),
            );
            if response.changed() && step > 0.0 {
                state.set_y_step(step);
            }

            // ---- Per-series mean ----
            if let Some(chart) = &state.chart {
                ui.separator();
                ui.strong("Mean");
                for named in &chart.series {
                    let text = match mean(&named.series) {
                        Ok(m) => format!("{}: {m:.3e}", named.label),
                        Err(_) => format!("{}: no data", named.label),
                    };
                    ui.label(text);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_dir_dialog(state);
                ui.close_menu();
            }
            let can_export = state.chart.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(state, "csv");
                ui.close_menu();
            }
            if ui
                .add_enabled(can_export, egui::Button::new("Export JSON…"))
                .clicked()
            {
                export_dialog(state, "json");
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dir) = &state.data_dir {
            let protocols: Vec<_> = state.tables.iter().map(|(p, _)| p.label()).collect();
            ui.label(format!("{}: {}", dir.display(), protocols.join(", ")));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_dir_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Open benchmark measurement folder")
        .pick_folder();

    if let Some(dir) = dir {
        state.open_dir(&dir);
    }
}

fn export_dialog(state: &mut AppState, ext: &str) {
    let Some(request) = &state.chart else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart data")
        .add_filter(ext.to_ascii_uppercase(), &[ext])
        .set_file_name(format!("chart.{ext}"))
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::export::export_file(&path, request) {
            log::error!("Failed to export chart: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
