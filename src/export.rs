use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chart::{ChartRequest, PlottingSurface};

// ---------------------------------------------------------------------------
// CSV: one row per point, `y` left empty where nothing was measured
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CsvRow<'a> {
    series: &'a str,
    x: f64,
    y: Option<f64>,
}

pub struct CsvExport<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvExport<W> {
    pub fn new(out: W) -> Self {
        CsvExport {
            writer: csv::Writer::from_writer(out),
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing CSV output: {}", e.error()))
    }
}

impl<W: Write> PlottingSurface for CsvExport<W> {
    fn render(&mut self, request: &ChartRequest) -> Result<()> {
        for named in &request.series {
            for point in &named.series.points {
                self.writer
                    .serialize(CsvRow {
                        series: &named.label,
                        x: point.x,
                        y: point.y.as_f64(),
                    })
                    .with_context(|| format!("writing CSV row for '{}'", named.label))?;
            }
        }
        self.writer.flush().context("flushing CSV output")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON: the whole request, axis metadata included
// ---------------------------------------------------------------------------

pub struct JsonExport<W: Write> {
    out: W,
}

impl<W: Write> JsonExport<W> {
    pub fn new(out: W) -> Self {
        JsonExport { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PlottingSurface for JsonExport<W> {
    fn render(&mut self, request: &ChartRequest) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, request).context("writing chart JSON")?;
        self.out.flush().context("flushing chart JSON")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File helpers, dispatch by extension
// ---------------------------------------------------------------------------

/// Write `request` to `path` as `.csv` or `.json`.
pub fn export_file(path: &Path, request: &ChartRequest) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" && ext != "json" {
        anyhow::bail!("Unsupported export extension: .{ext}");
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    if ext == "csv" {
        CsvExport::new(file).render(request)?;
    } else {
        JsonExport::new(file).render(request)?;
    }
    log::info!("Exported chart '{}' to {}", request.axis.title, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{assemble, AxisConfig};
    use crate::data::{NamedSeries, Series, Value};

    fn request() -> ChartRequest {
        let series: Series = [(1.0, Value::Measured(0.5)), (2.0, Value::Missing)]
            .into_iter()
            .collect();
        let axis = AxisConfig {
            y_step: 0.25,
            ..AxisConfig::default()
        };
        assemble(vec![NamedSeries::new("IKNP (k=128)", series)], axis).unwrap()
    }

    #[test]
    fn test_csv_export() {
        let mut surface = CsvExport::new(Vec::new());
        surface.render(&request()).unwrap();
        let text = String::from_utf8(surface.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, ["series,x,y", "IKNP (k=128),1.0,0.5", "IKNP (k=128),2.0,"]);
    }

    #[test]
    fn test_json_export() {
        let mut surface = JsonExport::new(Vec::new());
        surface.render(&request()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&surface.into_inner()).unwrap();
        assert_eq!(json["axis"]["title"], "All Protocols");
        assert_eq!(json["axis"]["x_log_base"], 2);
        assert_eq!(json["axis"]["y_ticks"].as_array().unwrap().len(), 3);
        let points = json["series"][0]["series"]["points"].as_array().unwrap();
        assert_eq!(points[0]["y"], 0.5);
        assert!(points[1]["y"].is_null());
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join(format!("ote-export-{}.png", std::process::id()));
        assert!(export_file(&path, &request()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_export_csv_file() {
        let path = std::env::temp_dir().join(format!("ote-export-{}.csv", std::process::id()));
        export_file(&path, &request()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("series,x,y"));
        std::fs::remove_file(&path).unwrap();
    }
}
