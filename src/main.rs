use eframe::egui;
use ote_bench_viewer::app::OteViewerApp;

/// Folder opened on start-up when present (see `generate_sample`).
const DEFAULT_DATA_DIR: &str = "data";

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OTE Benchmark Viewer",
        options,
        Box::new(|_cc| {
            let dir = std::path::Path::new(DEFAULT_DATA_DIR);
            let app = if dir.is_dir() {
                OteViewerApp::with_data_dir(dir)
            } else {
                OteViewerApp::default()
            };
            Ok(Box::new(app))
        }),
    )
}
