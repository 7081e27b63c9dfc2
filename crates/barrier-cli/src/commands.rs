pub mod default_config;
pub mod energy;
pub mod grid;
pub mod run;
