//! Renders a few classic direction fields to SVG files.
//!
//! ```sh
//! cargo run -p slopefield-plot --example gallery -- [output-dir]
//! ```
//!
//! Set `RUST_LOG=debug` to see grid sizes and streamline counts.

use std::{
    fs,
    path::{Path, PathBuf},
};

use slopefield_core::{Bounds, Density, FieldConfig, FieldType, Steps};
use slopefield_plot::{Error, SlopeFunction, pointwise, render};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("gallery"), PathBuf::from);
    fs::create_dir_all(&out_dir)?;

    let square = Bounds::new(-3.0, 3.0, -3.0, 3.0)?;
    let steps = Steps::new(0.3, 0.3)?;
    let base = FieldConfig::new(square, steps);

    save("growth", &pointwise(|_x, y| 0.5 * y), &base, &out_dir)?;
    save(
        "circles",
        &pointwise(|x, y| -x / y),
        &base
            .with_field_type(FieldType::Normalized)
            .with_streamlines(Density::default()),
        &out_dir,
    )?;
    save(
        "logistic",
        &pointwise(|_x, y| y * (1.0 - y)),
        &FieldConfig::new(Bounds::new(0.0, 6.0, -0.5, 1.5)?, Steps::new(0.25, 0.1)?)
            .with_field_type(FieldType::Normalized)
            .with_streamlines(Density::new(1.5)?),
        &out_dir,
    )?;
    save(
        "forced",
        &pointwise(|x, y| x.sin() - y),
        &base
            .with_field_type(FieldType::Normalized)
            .with_streamlines(Density::new(0.8)?),
        &out_dir,
    )?;

    Ok(())
}

fn save<F: SlopeFunction>(
    name: &str,
    f: &F,
    config: &FieldConfig,
    out_dir: &Path,
) -> Result<(), Error> {
    let figure = render(f, config)?;
    let path = out_dir.join(format!("{name}.svg"));
    figure.save_svg(&path)?;

    info!(
        streamlines = figure.streamlines().map_or(0, |s| s.lines().len()),
        path = %path.display(),
        "{name} saved"
    );
    Ok(())
}
