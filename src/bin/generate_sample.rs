use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use quake_catalogue::{write_catalogue_csv, write_catalogue_parquet, Catalogue, Column, ColumnData};

const OUTPUT_DIR: &str = "sample_data";

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Rough island outline: a noisy circle of (lon, lat) vertices.
fn coastline(rng: &mut SimpleRng) -> Vec<(f64, f64)> {
    (0..360)
        .map(|deg| {
            let theta = (deg as f64).to_radians();
            let radius = 6.0 + rng.gauss(0.0, 0.3);
            (140.0 + radius * theta.cos(), 36.0 + radius * theta.sin())
        })
        .collect()
}

/// Three plate boundaries as (name, polyline of (lon, lat)).
fn plates() -> Vec<(&'static str, Vec<(f64, f64)>)> {
    let line = |lon0: f64, lat0: f64, dlon: f64, dlat: f64, n: usize| {
        (0..n)
            .map(|i| (lon0 + dlon * i as f64, lat0 + dlat * i as f64))
            .collect::<Vec<_>>()
    };
    vec![
        ("PA", line(142.0, 20.0, 0.2, 1.0, 30)),
        ("PH", line(125.0, 5.0, 0.6, 0.9, 30)),
        ("EU", line(100.0, 45.0, 1.5, -0.1, 30)),
    ]
}

/// Origin time text in one of several layouts, as catalogues mix them.
fn format_time(rng: &mut SimpleRng, t: DateTime<Utc>, offset: &FixedOffset) -> String {
    match rng.next_u64() % 3 {
        0 => t
            .with_timezone(offset)
            .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
            .to_string(),
        1 => t.format("%Y-%m-%dT%H:%M:%S").to_string(),
        _ => t.format("%Y-%m-%d %H:%M:%S%.3fZ").to_string(),
    }
}

fn earthquakes(rng: &mut SimpleRng, plates: &[(&str, Vec<(f64, f64)>)], n: usize) -> Result<Catalogue> {
    let start = Utc
        .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .context("building catalogue start time")?;
    let eastern = FixedOffset::west_opt(5 * 3600).context("building UTC-5 offset")?;
    let span_secs = 20.0 * 365.25 * 86_400.0;

    let mut times = Vec::with_capacity(n);
    let mut lats = Vec::with_capacity(n);
    let mut lons = Vec::with_capacity(n);
    let mut depths = Vec::with_capacity(n);
    let mut mags = Vec::with_capacity(n);
    let mut mag_types = Vec::with_capacity(n);
    let mut ids = Vec::with_capacity(n);

    for id in 0..n {
        let (_, boundary) = &plates[rng.next_u64() as usize % plates.len()];
        let (lon, lat) = boundary[rng.next_u64() as usize % boundary.len()];

        let offset = Duration::seconds(rng.uniform(0.0, span_secs) as i64)
            + Duration::milliseconds((rng.next_u64() % 1000) as i64);
        times.push(Some(format_time(rng, start + offset, &eastern)));
        lons.push(Some(lon + rng.gauss(0.0, 0.5)));
        lats.push(Some(lat + rng.gauss(0.0, 0.5)));
        // Shallow events dominate; some slabs reach a few hundred km.
        depths.push(Some((-60.0 * rng.next_f64().max(1e-9).ln()).min(700.0)));
        // Gutenberg-Richter with b = 1 above magnitude 2.5.
        let mag = 2.5 - rng.next_f64().max(1e-9).log10();
        mags.push(Some((mag * 10.0).round() / 10.0));
        mag_types.push(Some(if mag >= 5.0 { "mw" } else { "mb" }.to_string()));
        ids.push(Some(id as i64));
    }

    Ok(Catalogue::from_columns(vec![
        Column::new("EventID", ColumnData::Integer(ids)),
        Column::new("Time", ColumnData::Text(times)),
        Column::new("Latitude", ColumnData::Float(lats)),
        Column::new("Longitude", ColumnData::Float(lons)),
        Column::new("Depth", ColumnData::Float(depths)),
        Column::new("Magnitude", ColumnData::Float(mags)),
        Column::new("MagType", ColumnData::Text(mag_types)),
    ])?)
}

fn write_rows<I>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let out = Path::new(OUTPUT_DIR);
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let coast = coastline(&mut rng);
    write_rows(
        &out.join("coastlines.csv"),
        coast
            .iter()
            .map(|(lon, lat)| vec![format!("{lon:.4}"), format!("{lat:.4}")]),
    )?;

    // On disk plate rows are name, latitude, longitude.
    let plates = plates();
    write_rows(
        &out.join("plates.csv"),
        plates.iter().flat_map(|(name, boundary)| {
            boundary
                .iter()
                .map(move |(lon, lat)| vec![name.to_string(), format!("{lat:.4}"), format!("{lon:.4}")])
        }),
    )?;

    let quakes = earthquakes(&mut rng, &plates, 500)?;
    write_catalogue_csv(out.join("earthquakes.csv"), &quakes)?;
    write_catalogue_parquet(out.join("earthquakes.parquet"), &quakes)?;

    println!(
        "Wrote {} coastline points, {} plates and {} earthquakes to {OUTPUT_DIR}/",
        coast.len(),
        plates.len(),
        quakes.len()
    );
    Ok(())
}
