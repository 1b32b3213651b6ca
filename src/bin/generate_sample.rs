use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

const ROWS: usize = 100;
/// Row numbers (1-based) left without an amount.
const MISSING_AMOUNT: [usize; 3] = [17, 48, 83];
const COUNTRIES: [&str; 5] = ["US", "DE", "FR", "BR", "IN"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("orders.csv"));

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;

    let mut writer =
        csv::Writer::from_path(&out).with_context(|| format!("creating {}", out.display()))?;
    writer.write_record(["order_id", "amount", "country", "order_date"])?;

    for id in 1..=ROWS {
        let amount = if MISSING_AMOUNT.contains(&id) {
            String::new()
        } else {
            format!("{:.2}", rng.gauss(54.0, 18.0).abs())
        };
        let country = rng.pick(&COUNTRIES);
        let date = start + Duration::days((rng.next_u64() % 90) as i64);

        writer.write_record([
            id.to_string(),
            amount,
            country.to_string(),
            date.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("Wrote {ROWS} orders to {}", out.display());
    println!("Wrote {}", out.display());
    Ok(())
}
