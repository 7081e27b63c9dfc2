use crate::cli::RunArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use barriermd::{
    core::analysis::{Basin, BasinOccupancy},
    engine::progress::ProgressReporter,
    workflows::simulate::{self, RunSummary},
};
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting Langevin dynamics...");
    info!("Invoking the core simulation workflow...");
    let result = simulate::run(&app_config.core_config, &reporter)?;

    let files = simulate::write_outputs(
        &result,
        &app_config.output_dir,
        app_config.grid.as_ref(),
    )?;
    println!("✓ Frames written to: {}", files.frames.display());
    if let Some(grid_path) = &files.grid {
        println!("✓ Contour data written to: {}", grid_path.display());
    }

    println!("{}", format_summary(&result.summary));
    Ok(())
}

pub fn format_summary(summary: &RunSummary) -> String {
    let occupancy = |label: &str, o: &BasinOccupancy| {
        format!(
            "  {:<18} left {:>5.1}% | central {:>5.1}% | right {:>5.1}%",
            label,
            100.0 * o.fraction(Basin::Left),
            100.0 * o.fraction(Basin::Central),
            100.0 * o.fraction(Basin::Right)
        )
    };

    [
        "Run summary".to_string(),
        format!("  {:<18} {}", "seed", summary.seed),
        format!(
            "  {:<18} {:.1} K",
            "final temperature", summary.final_temperature
        ),
        format!(
            "  {:<18} {:.3} kJ/mol per particle",
            "mean potential", summary.mean_potential_energy
        ),
        format!("  {:<18} {}", "barrier crossings", summary.barrier_crossings),
        occupancy("initial basins", &summary.initial_occupancy),
        occupancy("final basins", &summary.final_occupancy),
    ]
    .join("\n")
}
