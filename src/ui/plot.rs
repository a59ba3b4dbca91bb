use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{GridMark, Legend, Plot, PlotPoint, PlotPoints, Points};

use crate::chart::{ChartRequest, PlottingSurface};
use crate::color::ColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Benchmark chart (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart, or a hint / the last error when there is none.
pub fn benchmark_plot(ui: &mut Ui, state: &AppState) {
    let Some(request) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) if state.data_dir.is_some() => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            _ => {
                ui.heading("Open a measurement folder to view charts  (File → Open folder…)");
            }
        });
        return;
    };

    let mut surface = PlotSurface {
        ui,
        color_map: state.color_map.as_ref(),
    };
    if let Err(e) = surface.render(request) {
        log::error!("Failed to draw chart: {e:#}");
    }
}

/// Most y grid lines drawn at once; denser tick lists are thinned.
const MAX_GRID_MARKS: usize = 50;

/// Take every `n`-th tick so at most [`MAX_GRID_MARKS`] remain.
fn grid_stride(ticks: usize) -> usize {
    ticks.div_ceil(MAX_GRID_MARKS).max(1)
}

/// Draws a [`ChartRequest`] into an egui `Ui` with `egui_plot`.
///
/// The x axis is plotted as `log_base(x)` with labels in message counts;
/// missing points are simply not drawn.
pub struct PlotSurface<'a> {
    pub ui: &'a mut Ui,
    pub color_map: Option<&'a ColorMap>,
}

impl PlottingSurface for PlotSurface<'_> {
    fn render(&mut self, request: &ChartRequest) -> anyhow::Result<()> {
        let axis = &request.axis;
        let base = axis.x_log_base as f64;
        let to_plot_x = move |x: f64| x.log(base);

        self.ui.heading(&axis.title);

        let x_marks: Vec<GridMark> = axis
            .x_ticks
            .iter()
            .filter(|&&t| t > 0.0)
            .map(|&t| GridMark {
                value: to_plot_x(t),
                step_size: 1.0,
            })
            .collect();
        let y_step = match axis.y_ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => axis.y_max.max(f64::MIN_POSITIVE),
        };
        let stride = grid_stride(axis.y_ticks.len());
        let y_marks: Vec<GridMark> = axis
            .y_ticks
            .iter()
            .step_by(stride)
            .map(|&t| GridMark {
                value: t,
                step_size: y_step * stride as f64,
            })
            .collect();

        let mut plot = Plot::new("benchmark_plot")
            .legend(Legend::default())
            .x_axis_label(axis.x_label.as_str())
            .y_axis_label(axis.y_label.as_str())
            .x_axis_formatter(move |mark, _range| format!("{:.0}", base.powf(mark.value)))
            .label_formatter(move |name: &str, value: &PlotPoint| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{name}\nm = {:.0}\ny = {:.3e}", base.powf(value.x), value.y)
                }
            })
            .include_y(0.0)
            .include_y(axis.y_max)
            .y_grid_spacer(move |_input| y_marks.clone())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true);
        if !x_marks.is_empty() {
            plot = plot.x_grid_spacer(move |_input| x_marks.clone());
        }

        plot.show(self.ui, |plot_ui| {
            for named in &request.series {
                let color = self
                    .color_map
                    .map(|cm| cm.color_for(&named.label))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = named
                    .series
                    .measured()
                    .map(|(x, y)| [to_plot_x(x), y])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(&named.label)
                        .color(color)
                        .radius(3.5),
                );
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_stride() {
        assert_eq!(grid_stride(0), 1);
        assert_eq!(grid_stride(11), 1);
        assert_eq!(grid_stride(50), 1);
        assert_eq!(grid_stride(51), 2);
        assert_eq!(grid_stride(20_001), 401);
        assert!((0..20_001).step_by(grid_stride(20_001)).count() <= MAX_GRID_MARKS);
    }
}
