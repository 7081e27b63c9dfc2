use crate::core::forcefield::params::SurfaceParams;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub num_particles: usize,
    /// Mass of every particle, in amu.
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorConfig {
    /// Bath temperature in K.
    pub temperature: f64,
    /// Collision rate in ps⁻¹.
    pub friction: f64,
    /// Step size in ps.
    pub timestep: f64,
    /// Seed for initial positions, velocities and thermal noise. `None` draws one.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub num_steps: u64,
    /// Steps between recorded frames.
    pub report_interval: u64,
}

impl RunConfig {
    /// Frames recorded by a run, including the initial one.
    pub fn num_frames(&self) -> usize {
        1 + self.num_steps.div_ceil(self.report_interval) as usize
    }
}

/// Box from which starting positions are drawn uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConfig {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub system: SystemConfig,
    pub integrator: IntegratorConfig,
    pub run: RunConfig,
    pub initial: InitialConfig,
    pub surface: SurfaceParams,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    num_particles: Option<usize>,
    mass: Option<f64>,
    temperature: Option<f64>,
    friction: Option<f64>,
    timestep: Option<f64>,
    seed: Option<u64>,
    num_steps: Option<u64>,
    report_interval: Option<u64>,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    z: Option<f64>,
    surface: Option<SurfaceParams>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_particles(mut self, n: usize) -> Self {
        self.num_particles = Some(n);
        self
    }
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }
    pub fn temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }
    pub fn friction(mut self, per_ps: f64) -> Self {
        self.friction = Some(per_ps);
        self
    }
    pub fn timestep(mut self, ps: f64) -> Self {
        self.timestep = Some(ps);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn num_steps(mut self, steps: u64) -> Self {
        self.num_steps = Some(steps);
        self
    }
    pub fn report_interval(mut self, steps: u64) -> Self {
        self.report_interval = Some(steps);
        self
    }
    pub fn x_range(mut self, range: (f64, f64)) -> Self {
        self.x_range = Some(range);
        self
    }
    pub fn y_range(mut self, range: (f64, f64)) -> Self {
        self.y_range = Some(range);
        self
    }
    pub fn initial_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }
    pub fn surface(mut self, params: SurfaceParams) -> Self {
        self.surface = Some(params);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let system = SystemConfig {
            num_particles: self
                .num_particles
                .ok_or(ConfigError::MissingParameter("num_particles"))?,
            mass: self.mass.ok_or(ConfigError::MissingParameter("mass"))?,
        };
        let integrator = IntegratorConfig {
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            friction: self
                .friction
                .ok_or(ConfigError::MissingParameter("friction"))?,
            timestep: self
                .timestep
                .ok_or(ConfigError::MissingParameter("timestep"))?,
            seed: self.seed,
        };
        let run = RunConfig {
            num_steps: self
                .num_steps
                .ok_or(ConfigError::MissingParameter("num_steps"))?,
            report_interval: self
                .report_interval
                .ok_or(ConfigError::MissingParameter("report_interval"))?,
        };
        let initial = InitialConfig {
            x_range: self
                .x_range
                .ok_or(ConfigError::MissingParameter("x_range"))?,
            y_range: self
                .y_range
                .ok_or(ConfigError::MissingParameter("y_range"))?,
            z: self.z.unwrap_or(0.0),
        };

        let config = SimulationConfig {
            system,
            integrator,
            run,
            initial,
            surface: self.surface.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        parameter,
        reason: reason.into(),
    }
}

fn check_range(parameter: &'static str, range: (f64, f64)) -> Result<(), ConfigError> {
    if !(range.0.is_finite() && range.1.is_finite()) {
        return Err(invalid(parameter, "bounds must be finite"));
    }
    if range.0 > range.1 {
        return Err(invalid(
            parameter,
            format!("lower bound {} exceeds upper bound {}", range.0, range.1),
        ));
    }
    Ok(())
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system.num_particles == 0 {
            return Err(invalid("num_particles", "at least one particle is required"));
        }
        if !(self.system.mass.is_finite() && self.system.mass > 0.0) {
            return Err(invalid("mass", format!("must be positive, got {}", self.system.mass)));
        }
        let integrator = &self.integrator;
        if !(integrator.temperature.is_finite() && integrator.temperature >= 0.0) {
            return Err(invalid(
                "temperature",
                format!("must be non-negative, got {}", integrator.temperature),
            ));
        }
        if !(integrator.friction.is_finite() && integrator.friction >= 0.0) {
            return Err(invalid(
                "friction",
                format!("must be non-negative, got {}", integrator.friction),
            ));
        }
        if !(integrator.timestep.is_finite() && integrator.timestep > 0.0) {
            return Err(invalid(
                "timestep",
                format!("must be positive, got {}", integrator.timestep),
            ));
        }
        if self.run.report_interval == 0 {
            return Err(invalid("report_interval", "must be at least one step"));
        }
        check_range("x_range", self.initial.x_range)?;
        check_range("y_range", self.initial.y_range)?;
        if !self.initial.z.is_finite() {
            return Err(invalid("initial_z", "must be finite"));
        }
        self.surface
            .validate()
            .map_err(|e| invalid("surface", e.to_string()))?;
        Ok(())
    }
}
