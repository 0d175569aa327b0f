use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde_json::json;
use stopwatch::Stopwatch;

use mapview::extract::{clusters_from_geojson, coordinates_from_geojson};
use mapview::{estimate_center, extract_clusters, extract_coordinates, load_config, CacheKey,
              CenterCache, CenterStrategy, DensityGrid, Point, Size};

#[derive(Parser, Debug)]
#[command(name = "mapview", version, about = "Map auto-center and tooltip placement")]
struct Args {
    /// Config JSON file
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate a map center from a listings payload
    Center {
        /// Input file or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// density or largest-cluster; defaults to the config value
        #[arg(short = 's', long = "strategy")]
        strategy: Option<CenterStrategy>,

        /// Treat input as GeoJSON
        #[arg(long = "geojson")]
        geojson: bool,

        /// Write the density grid to this image file
        #[arg(long = "heatmap")]
        heatmap: Option<PathBuf>,

        /// Center cache file, read and updated in place
        #[arg(long = "cache")]
        cache: Option<PathBuf>,

        /// Credential the cached center is keyed by
        #[arg(long = "credential", default_value = "default")]
        credential: String,
    },
    /// Compute a tooltip position
    Tooltip {
        /// Anchor as X,Y
        #[arg(long = "anchor", value_parser = parse_pair)]
        anchor: (f64, f64),

        /// Tooltip size as W,H
        #[arg(long = "size", value_parser = parse_pair)]
        size: (f64, f64),

        /// Viewport size as W,H
        #[arg(long = "viewport", value_parser = parse_pair)]
        viewport: (f64, f64),

        /// Viewport padding; defaults to the config value
        #[arg(long = "padding")]
        padding: Option<f64>,
    },
}

fn parse_pair(s: &str) -> std::result::Result<(f64, f64), String> {
    let mut parts = s.split(',').map(|p| p.trim().parse::<f64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b)), None) => Ok((a, b)),
        _ => Err(format!("expected two comma separated numbers, got '{}'", s)),
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        Some(p) if p.as_os_str() != "-" => {
            File::open(p)
                .with_context(|| format!("failed to open {}", p.display()))?
                .read_to_end(&mut buf)?;
        }
        _ => {
            io::stdin().read_to_end(&mut buf)?;
        }
    }
    Ok(buf)
}

fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Center { input, strategy, geojson, heatmap, cache, credential } => {
            let strategy = strategy.unwrap_or(config.strategy);
            let mut s = Stopwatch::start_new();
            let bytes = read_input(input.as_ref())?;
            let (extraction, clusters) = if geojson {
                (coordinates_from_geojson(&bytes[..])?, clusters_from_geojson(&bytes[..])?)
            } else {
                let value: serde_json::Value = serde_json::from_slice(&bytes)
                    .context("input is not JSON")?;
                (extract_coordinates(&value), extract_clusters(&value))
            };
            info!("parsed {} coordinates and {} clusters in {} ms ({} skipped)",
                  extraction.coordinates.len(),
                  clusters.len(),
                  s.elapsed_ms(),
                  extraction.skipped);

            s.restart();
            let coords = &extraction.coordinates;
            let compute = || estimate_center(strategy, coords, &clusters, config.grid_size);
            let estimate = match cache {
                Some(ref path) => {
                    let mut store = if path.exists() {
                        CenterCache::load(File::open(path)?, config.cache_ttl_secs)
                            .with_context(|| format!("failed to read cache {}", path.display()))?
                    } else {
                        CenterCache::new(config.cache_ttl_secs)
                    };
                    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
                    store.purge_expired(now);
                    let estimate = store.get_or_compute(CacheKey::new(credential, strategy), now, compute);
                    store.save(File::create(path)?)?;
                    estimate
                }
                None => compute(),
            };
            debug!("{} estimate took {} ms", strategy, s.elapsed_ms());

            if let Some(path) = heatmap {
                let grid = DensityGrid::from_coordinates(coords, config.grid_size, config.grid_size)
                    .ok_or_else(|| anyhow!("no coordinates to draw a heatmap from"))?;
                grid.write_heatmap(&path)?;
                let (lat_m, lng_m) = grid.resolution();
                info!("wrote {:?} heatmap to {}, cells {:.0} m x {:.0} m",
                      grid.size(),
                      path.display(),
                      lat_m,
                      lng_m);
            }

            let out = match estimate {
                Some(c) => json!({"lat": c.lat, "lng": c.lng, "skipped": extraction.skipped}),
                None => serde_json::Value::Null,
            };
            println!("{}", out);
        }
        Command::Tooltip { anchor, size, viewport, padding } => {
            let mut placer = config.tooltip;
            if let Some(p) = padding {
                placer = placer.padding(p);
            }
            let placement = placer.place(Point::new(anchor.0, anchor.1),
                                         Size::new(size.0, size.1),
                                         Size::new(viewport.0, viewport.1));
            println!("{}", serde_json::to_string(&placement)?);
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
