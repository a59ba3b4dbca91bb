use std::collections::BTreeSet;

use super::aggregate::running_mean;
use super::error::DataError;
use super::model::{MeasurementTable, NamedSeries};
use super::normalize::Divisor;
use crate::protocol::Protocol;

// ---------------------------------------------------------------------------
// Selection: which (protocol, k) series to chart and how to transform them
// ---------------------------------------------------------------------------

/// Security parameter charted when nothing else has been chosen.
pub const DEFAULT_SECURITY_PARAM: u64 = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Protocols to show. Empty means nothing is charted.
    pub protocols: BTreeSet<Protocol>,
    pub security_param: u64,
    pub divisor: Divisor,
    /// Chart the cumulative mean instead of the raw values.
    pub running_mean: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            protocols: Protocol::ALL.into_iter().collect(),
            security_param: DEFAULT_SECURITY_PARAM,
            divisor: Divisor::default(),
            running_mean: false,
        }
    }
}

/// Legend label for one protocol at one security parameter.
pub fn series_label(protocol: Protocol, k: u64) -> String {
    format!("{} (k={k})", protocol.label())
}

/// Build the labelled series for every selected protocol, in the order the
/// tables are given (registry order when they come from `load_all`).
///
/// A table without the selected security parameter contributes nothing.
pub fn selected_series(
    tables: &[(Protocol, MeasurementTable)],
    selection: &Selection,
) -> Result<Vec<NamedSeries>, DataError> {
    let mut out = Vec::new();
    for (protocol, table) in tables {
        if !selection.protocols.contains(protocol) {
            continue;
        }
        let Some(series) = table.series(selection.security_param) else {
            log::warn!(
                "{protocol} has no measurements for k={}, available: {:?}",
                selection.security_param,
                table.security_params()
            );
            continue;
        };

        let mut series = selection.divisor.apply(&series)?;
        if selection.running_mean {
            series = running_mean(&series);
        }
        out.push(NamedSeries::new(
            series_label(*protocol, selection.security_param),
            series,
        ));
    }
    Ok(out)
}

/// Union of the security parameters present in any table, ascending.
pub fn available_security_params(tables: &[(Protocol, MeasurementTable)]) -> Vec<u64> {
    tables
        .iter()
        .flat_map(|(_, t)| t.security_params().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Union of the message sizes of all tables, ascending. Used as x ticks.
pub fn default_x_ticks(tables: &[(Protocol, MeasurementTable)]) -> Vec<f64> {
    tables
        .iter()
        .flat_map(|(_, t)| t.message_sizes().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|m| m as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_measurements;
    use crate::data::model::Value;
    use std::io::Cursor;

    fn tables() -> Vec<(Protocol, MeasurementTable)> {
        let iknp = parse_measurements(Cursor::new("2 4\n128 256\n2000 4000\n4000 -1\n")).unwrap();
        let alsz = parse_measurements(Cursor::new("4 8\n256\n1000\n3000\n")).unwrap();
        vec![(Protocol::Iknp, iknp), (Protocol::Alsz, alsz)]
    }

    #[test]
    fn test_default_selection_skips_missing_k() {
        let series = selected_series(&tables(), &Selection::default()).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "IKNP (k=128)");
    }

    #[test]
    fn test_per_message_selection() {
        let selection = Selection {
            security_param: 256,
            divisor: Divisor::PerMessage,
            ..Selection::default()
        };
        let series = selected_series(&tables(), &selection).unwrap();
        let labels: Vec<_> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["IKNP (k=256)", "ALSZ (k=256)"]);

        let iknp = &series[0].series.points;
        let y = iknp[0].y.as_f64().unwrap();
        assert!((y - 2e-6).abs() < 1e-18);
        assert_eq!(iknp[1].y, Value::Missing);
    }

    #[test]
    fn test_protocol_filter() {
        let selection = Selection {
            protocols: [Protocol::Alsz].into_iter().collect(),
            security_param: 256,
            ..Selection::default()
        };
        let series = selected_series(&tables(), &selection).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "ALSZ (k=256)");
    }

    #[test]
    fn test_axis_domains() {
        let t = tables();
        assert_eq!(available_security_params(&t), [128, 256]);
        assert_eq!(default_x_ticks(&t), [2.0, 4.0, 8.0]);
    }
}
