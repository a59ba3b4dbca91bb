use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::chart::{assemble, AxisConfig, ChartRequest};
use crate::color::ColorMap;
use crate::data::loader::load_all;
use crate::data::normalize::Divisor;
use crate::data::select::{
    available_security_params, default_x_ticks, selected_series, Selection,
};
use crate::data::MeasurementTable;
use crate::protocol::Protocol;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Folder the measurement files were read from (None until chosen).
    pub data_dir: Option<PathBuf>,

    /// Loaded tables, registry order.
    pub tables: Vec<(Protocol, MeasurementTable)>,

    /// Which series to chart and how.
    pub selection: Selection,

    /// Axis settings that do not come from the data.
    pub axis: AxisConfig,

    /// Rendering request for the current selection (cached).
    pub chart: Option<ChartRequest>,

    /// Series colours for the current chart.
    pub color_map: Option<ColorMap>,

    /// Protocol files in `data_dir` that exist but failed to load.
    pub load_errors: Vec<(Protocol, String)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_dir: None,
            tables: Vec::new(),
            selection: Selection::default(),
            axis: AxisConfig::default(),
            chart: None,
            color_map: None,
            load_errors: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load every protocol file found in `dir` and chart it.
    pub fn open_dir(&mut self, dir: &Path) {
        let loaded = load_all(dir);
        self.load_errors = loaded
            .failures
            .iter()
            .map(|(protocol, e)| (*protocol, format!("{e:#}")))
            .collect();

        if loaded.tables.is_empty() {
            let names: Vec<_> = Protocol::ALL.iter().map(Protocol::filename).collect();
            log::error!("No usable measurement files in {}", dir.display());
            let mut msg = format!(
                "No readable measurement files ({}) in {}",
                names.join(", "),
                dir.display()
            );
            if let Some(errors) = self.load_error_summary() {
                msg = format!("{msg}; {errors}");
            }
            self.status_message = Some(msg);
            return;
        }
        self.data_dir = Some(dir.to_path_buf());
        self.set_tables(loaded.tables);
    }

    /// Ingest newly loaded tables and pick a security parameter they have.
    pub fn set_tables(&mut self, tables: Vec<(Protocol, MeasurementTable)>) {
        let params = available_security_params(&tables);
        if !params.contains(&self.selection.security_param) {
            if let Some(&first) = params.first() {
                self.selection.security_param = first;
            }
        }
        self.axis.x_ticks = default_x_ticks(&tables);
        self.tables = tables;
        self.rebuild_chart();
    }

    /// The load error recorded for `protocol`, if its file was invalid.
    pub fn load_error(&self, protocol: Protocol) -> Option<&str> {
        self.load_errors
            .iter()
            .find(|(p, _)| *p == protocol)
            .map(|(_, e)| e.as_str())
    }

    /// All load errors on one line, for the status bar.
    fn load_error_summary(&self) -> Option<String> {
        if self.load_errors.is_empty() {
            return None;
        }
        let parts: Vec<_> = self
            .load_errors
            .iter()
            .map(|(protocol, e)| format!("{protocol}: {e}"))
            .collect();
        Some(parts.join("; "))
    }

    /// Security parameters present in any loaded table.
    pub fn security_params(&self) -> Vec<u64> {
        available_security_params(&self.tables)
    }

    /// Build the request for the current selection.
    pub fn build_request(&self) -> Result<ChartRequest> {
        let series = selected_series(&self.tables, &self.selection)?;

        let mut y_label = self.selection.divisor.y_label().to_string();
        if self.selection.running_mean {
            y_label.push_str(", running mean");
        }
        let axis = AxisConfig {
            title: chart_title(&self.selection),
            y_label,
            ..self.axis.clone()
        };
        Ok(assemble(series, axis)?)
    }

    /// Recompute `chart` after any selection change.
    pub fn rebuild_chart(&mut self) {
        match self.build_request() {
            Ok(request) => {
                self.color_map = Some(ColorMap::new(
                    request.series.iter().map(|s| s.label.as_str()),
                ));
                self.chart = Some(request);
                self.status_message = self.load_error_summary();
            }
            Err(e) => {
                log::warn!("Cannot chart current selection: {e:#}");
                self.chart = None;
                self.color_map = None;
                let mut msg = format!("{e:#}");
                if let Some(errors) = self.load_error_summary() {
                    msg = format!("{msg}; {errors}");
                }
                self.status_message = Some(msg);
            }
        }
    }

    pub fn toggle_protocol(&mut self, protocol: Protocol) {
        if !self.selection.protocols.remove(&protocol) {
            self.selection.protocols.insert(protocol);
        }
        self.rebuild_chart();
    }

    pub fn set_security_param(&mut self, k: u64) {
        self.selection.security_param = k;
        self.rebuild_chart();
    }

    pub fn set_divisor(&mut self, divisor: Divisor) {
        self.selection.divisor = divisor;
        self.rebuild_chart();
    }

    pub fn set_running_mean(&mut self, on: bool) {
        self.selection.running_mean = on;
        self.rebuild_chart();
    }

    pub fn set_y_step(&mut self, step: f64) {
        self.axis.y_step = step;
        self.rebuild_chart();
    }
}

/// "All Protocols" when everything is shown, otherwise the labels compared.
fn chart_title(selection: &Selection) -> String {
    if selection.protocols.len() == Protocol::ALL.len() {
        return "All Protocols".to_string();
    }
    let labels: Vec<_> = Protocol::ALL
        .iter()
        .filter(|p| selection.protocols.contains(p))
        .map(Protocol::label)
        .collect();
    labels.join(" vs ")
}
