use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};

use super::error::DataError;
use super::model::{MeasurementTable, Value};
use crate::protocol::Protocol;

/// Nanoseconds → seconds.
pub const TIME_SCALE: f64 = 1e-9;

/// Timing code the harness writes for combinations it did not measure.
pub const MISSING_CODE: i64 = -1;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and parse one measurement file.
pub fn load_file(path: &Path) -> Result<MeasurementTable> {
    let file = File::open(path)
        .with_context(|| format!("opening measurement file {}", path.display()))?;
    let table = parse_measurements(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    log::info!(
        "Loaded {}: {} message sizes x {} security params, {} measured cells",
        path.display(),
        table.len(),
        table.security_params().len(),
        table.measured_count()
    );
    Ok(table)
}

/// Load the file the registry names for `protocol` from `dir`.
pub fn load_protocol(dir: &Path, protocol: Protocol) -> Result<MeasurementTable> {
    load_file(&dir.join(protocol.filename()))
        .with_context(|| format!("loading {protocol} measurements"))
}

/// Outcome of scanning a folder for every registered protocol.
#[derive(Debug, Default)]
pub struct LoadedTables {
    /// Tables that parsed, registry order.
    pub tables: Vec<(Protocol, MeasurementTable)>,
    /// Files that exist but could not be read or parsed.
    pub failures: Vec<(Protocol, anyhow::Error)>,
}

/// Load every registered protocol found in `dir`, in registry order.
///
/// An absent file is only logged; a file that is present but unreadable
/// or malformed ends up in `failures` with its line-numbered error.
pub fn load_all(dir: &Path) -> LoadedTables {
    let mut loaded = LoadedTables::default();
    for protocol in Protocol::ALL {
        let path = dir.join(protocol.filename());
        if !path.exists() {
            log::info!("No {protocol} measurements at {}", path.display());
            continue;
        }
        match load_protocol(dir, protocol) {
            Ok(table) => loaded.tables.push((protocol, table)),
            Err(e) => {
                log::warn!("Invalid {protocol} measurements: {e:#}");
                loaded.failures.push((protocol, e));
            }
        }
    }
    loaded
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

/// Parse the benchmark harness's flat text format.
///
/// ```text
/// <m_1> <m_2> ... <m_N>      message sizes, strictly increasing
/// <k_1> <k_2> ... <k_M>      security parameters
/// <t_11> ... <t_1M>          timings (ns) for m_1, one column per k
/// ...
/// <t_N1> ... <t_NM>          timings (ns) for m_N
/// ```
///
/// Exactly `N` data rows are read; anything after them is ignored. A code of
/// `-1` becomes [`Value::Missing`].
pub fn parse_measurements<R: BufRead>(reader: R) -> Result<MeasurementTable, DataError> {
    let mut lines = NumberedLines::new(reader);

    let message_sizes = parse_header(&mut lines, "message sizes")?;
    if let Some(pair) = message_sizes.windows(2).find(|w| w[0] >= w[1]) {
        return Err(DataError::format(
            1,
            &join(&message_sizes),
            format!("message sizes must be strictly increasing ({} then {})", pair[0], pair[1]),
        ));
    }

    let security_params = parse_header(&mut lines, "security parameters")?;
    let mut seen = BTreeSet::new();
    if let Some(dup) = security_params.iter().find(|&&k| !seen.insert(k)) {
        return Err(DataError::format(
            2,
            &join(&security_params),
            format!("security parameter {dup} listed twice"),
        ));
    }

    let mut timings: BTreeMap<u64, Vec<(u64, Value)>> = security_params
        .iter()
        .map(|&k| (k, Vec::with_capacity(message_sizes.len())))
        .collect();

    for (row, &m) in message_sizes.iter().enumerate() {
        let Some((line_no, line)) = lines.next_line()? else {
            return Err(DataError::Truncated {
                expected: message_sizes.len(),
                found: row,
            });
        };

        let codes: Vec<&str> = line.split_whitespace().collect();
        if codes.len() != security_params.len() {
            return Err(DataError::format(
                line_no,
                &line,
                format!(
                    "expected {} timing columns, found {}",
                    security_params.len(),
                    codes.len()
                ),
            ));
        }

        for (code, k) in codes.iter().zip(&security_params) {
            let value =
                parse_code(code).map_err(|reason| DataError::format(line_no, &line, reason))?;
            if let Some(column) = timings.get_mut(k) {
                column.push((m, value));
            }
        }
    }

    Ok(MeasurementTable::from_parts(
        message_sizes,
        security_params,
        timings,
    ))
}

// -- helpers --

/// `lines()` with a 1-based counter of the lines handed out so far.
struct NumberedLines<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        NumberedLines {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, DataError> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some((self.line_no, line?)))
            }
            None => Ok(None),
        }
    }
}

fn parse_header<R: BufRead>(lines: &mut NumberedLines<R>, what: &str) -> Result<Vec<u64>, DataError> {
    let Some((line_no, line)) = lines.next_line()? else {
        return Err(DataError::format(
            lines.line_no + 1,
            "",
            format!("missing {what} line"),
        ));
    };

    let values = line
        .split_whitespace()
        .map(|tok| match tok.parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(DataError::format(
                line_no,
                &line,
                format!("{what}: '{tok}' is not a positive integer"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(DataError::format(line_no, &line, format!("no {what} given")));
    }
    Ok(values)
}

fn parse_code(tok: &str) -> Result<Value, String> {
    let code: i64 = tok
        .parse()
        .map_err(|_| format!("'{tok}' is not an integer timing code"))?;
    match code {
        MISSING_CODE => Ok(Value::Missing),
        c if c < 0 => Err(format!("negative timing code {c}")),
        c => Ok(Value::Measured(c as f64 * TIME_SCALE)),
    }
}

fn join(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
