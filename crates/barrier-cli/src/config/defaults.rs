use super::file::{
    FileConfig, FileInitialConfig, FileIntegratorConfig, FileOutputConfig, FileRunConfig,
    FileSystemConfig,
};
use barriermd::core::forcefield::params::SurfaceParams;
use barriermd::core::io::grid::GridSpec;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub num_particles: usize,
    pub mass: f64,
    pub temperature: f64,
    pub friction: f64,
    pub timestep: f64,
    pub num_steps: u64,
    pub report_interval: u64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub initial_z: f64,
    pub output_dir: PathBuf,
    pub write_grid: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            num_particles: 100,
            mass: 1.0,
            temperature: 750.0,
            friction: 100.0,
            timestep: 0.01,
            num_steps: 1000,
            report_interval: 100,
            x_range: (-1.0, 1.0),
            y_range: (-0.5, 0.5),
            initial_z: 0.0,
            output_dir: PathBuf::from("barriermd-output"),
            write_grid: true,
        }
    }
}

impl DefaultsConfig {
    /// The defaults as a fully populated file configuration, for `barriermd config`.
    pub fn to_file_config(&self) -> FileConfig {
        FileConfig {
            system: Some(FileSystemConfig {
                num_particles: Some(self.num_particles),
                mass: Some(self.mass),
            }),
            integrator: Some(FileIntegratorConfig {
                temperature: Some(self.temperature),
                friction: Some(self.friction),
                timestep: Some(self.timestep),
                seed: None,
            }),
            run: Some(FileRunConfig {
                num_steps: Some(self.num_steps),
                report_interval: Some(self.report_interval),
            }),
            initial: Some(FileInitialConfig {
                x_range: Some(self.x_range),
                y_range: Some(self.y_range),
                z: Some(self.initial_z),
            }),
            surface: Some(SurfaceParams::default()),
            output: Some(FileOutputConfig {
                directory: Some(self.output_dir.clone()),
                write_grid: Some(self.write_grid),
                grid: Some(GridSpec::default()),
            }),
        }
    }
}
