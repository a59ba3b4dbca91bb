use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use ote_bench_viewer::data::loader::{MISSING_CODE, TIME_SCALE};
use ote_bench_viewer::protocol::Protocol;

/// Seeded splitmix64 stream, enough to make repeated runs look measured.
struct Jitter(u64);

impl Jitter {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// `value` scaled by a uniform factor in `[1 - spread, 1 + spread)`.
    fn around(&mut self, value: f64, spread: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        value * (1.0 + spread * (2.0 * unit - 1.0))
    }
}

/// Rough cost model in seconds: fixed setup plus per-message work that grows
/// with the security parameter.
struct CostModel {
    setup: f64,
    per_message: f64,
    /// Largest message count the slow base-OT run is allowed to take.
    max_messages: Option<u64>,
}

fn cost_model(protocol: Protocol) -> CostModel {
    match protocol {
        Protocol::Primitive => CostModel {
            setup: 0.0,
            per_message: 4.0e-3,
            max_messages: Some(1 << 10),
        },
        Protocol::Iknp => CostModel {
            setup: 0.5,
            per_message: 6.0e-6,
            max_messages: None,
        },
        Protocol::Alsz => CostModel {
            setup: 0.5,
            per_message: 4.5e-6,
            max_messages: None,
        },
    }
}

/// One measurement file in the harness layout: sizes, security parameters,
/// then one row of nanosecond timings per size. No trailing newline.
fn render(
    protocol: Protocol,
    message_sizes: &[u64],
    security_params: &[u64],
    jitter: &mut Jitter,
) -> String {
    let model = cost_model(protocol);
    let join = |xs: &[u64]| xs.iter().map(u64::to_string).collect::<Vec<_>>().join(" ");

    let mut text = join(message_sizes);
    text.push('\n');
    text.push_str(&join(security_params));

    for &m in message_sizes {
        let row: Vec<String> = security_params
            .iter()
            .map(|&k| {
                if model.max_messages.is_some_and(|max| m > max) {
                    return MISSING_CODE.to_string();
                }
                let scale = k as f64 / 128.0;
                let seconds = (model.setup + model.per_message * m as f64) * scale;
                let noisy = jitter.around(seconds, 0.03);
                ((noisy / TIME_SCALE) as i64).to_string()
            })
            .collect();
        // infallible for String
        let _ = write!(text, "\n{}", row.join(" "));
    }
    text
}

fn main() -> Result<()> {
    env_logger::init();
    let mut jitter = Jitter(42);

    // Message counts: 2^1 → 2^13, as in the primitive-vs-extension runs
    let message_sizes: Vec<u64> = (1..14).map(|x| 1u64 << x).collect();
    let security_params = [128u64, 256];

    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for protocol in Protocol::ALL {
        let text = render(protocol, &message_sizes, &security_params, &mut jitter);
        let path = out_dir.join(protocol.filename());
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        println!(
            "Wrote {} x {} timings for {protocol} to {}",
            message_sizes.len(),
            security_params.len(),
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ote_bench_viewer::data::loader::parse_measurements;
    use std::io::Cursor;

    #[test]
    fn test_jitter_stays_in_band() {
        let mut jitter = Jitter(7);
        for _ in 0..1000 {
            let v = jitter.around(10.0, 0.03);
            assert!((9.7..10.3).contains(&v), "{v}");
        }
    }

    #[test]
    fn test_rendered_file_parses() {
        let sizes = [2u64, 1024, 2048];
        let mut jitter = Jitter(1);
        let text = render(Protocol::Primitive, &sizes, &[128, 256], &mut jitter);
        assert!(!text.ends_with('\n'));

        let table = parse_measurements(Cursor::new(text)).unwrap();
        assert_eq!(table.message_sizes(), [2, 1024, 2048]);
        let series = table.series(128).unwrap();
        assert!(!series.points[0].y.is_missing());
        assert!(!series.points[1].y.is_missing());
        assert!(series.points[2].y.is_missing());
    }
}
