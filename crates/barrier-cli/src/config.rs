mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_config, grid_spec, surface_params};
pub use defaults::DefaultsConfig;
pub use file::FileConfig;
