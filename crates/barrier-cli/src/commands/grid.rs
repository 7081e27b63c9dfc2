use crate::cli::GridArgs;
use crate::config::{FileConfig, grid_spec, surface_params};
use crate::error::Result;
use barriermd::core::forcefield::surface::TwoBarrierSurface;
use barriermd::core::io::export::write_grid_to_path;
use barriermd::core::io::grid::{GridSpec, PotentialGrid};
use tracing::info;

pub fn run(args: GridArgs) -> Result<()> {
    let file_config = FileConfig::load_optional(args.config.as_deref())?;
    let surface = TwoBarrierSurface::new(surface_params(&file_config, args.surface.as_deref())?);
    let spec = apply_overrides(&args, grid_spec(&file_config));

    info!(
        "Sampling x in [{}, {}], y in [{}, {}] at z = {} with {} points per axis.",
        spec.x_min, spec.x_max, spec.y_min, spec.y_max, spec.z, spec.resolution
    );
    let grid = PotentialGrid::sample(&surface, &spec)?;
    write_grid_to_path(&grid, &args.output)?;

    println!(
        "✓ Contour data ({} points) written to: {}",
        spec.resolution * spec.resolution,
        args.output.display()
    );
    println!(
        "  energy range [{:.3}, {:.3}] kJ/mol",
        grid.min(),
        grid.max()
    );
    let levels = grid.contour_levels(args.levels, args.ceiling);
    if !levels.is_empty() {
        let formatted: Vec<String> = levels.iter().map(|l| format!("{:.2}", l)).collect();
        println!("  contour levels: {}", formatted.join(", "));
    }
    Ok(())
}

fn apply_overrides(args: &GridArgs, mut spec: GridSpec) -> GridSpec {
    if let Some(v) = args.x_min {
        spec.x_min = v;
    }
    if let Some(v) = args.x_max {
        spec.x_max = v;
    }
    if let Some(v) = args.y_min {
        spec.y_min = v;
    }
    if let Some(v) = args.y_max {
        spec.y_max = v;
    }
    if let Some(v) = args.resolution {
        spec.resolution = v;
    }
    spec
}
