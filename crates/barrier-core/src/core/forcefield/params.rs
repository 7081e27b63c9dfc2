use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// A Gaussian ridge along x, modulated by the well profile along y.
///
/// Contributes `height · g(y) · exp(-sharpness · (x - center)²)` to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BarrierParams {
    pub height: f64,
    pub center: f64,
    pub sharpness: f64,
}

impl BarrierParams {
    /// The lower barrier at x = +2 nm.
    pub const RIGHT: Self = Self {
        height: 20.0,
        center: 2.0,
        sharpness: 2.0 / 4.0,
    };

    /// The higher barrier at x = -2 nm.
    pub const LEFT: Self = Self {
        height: 50.0,
        center: -2.0,
        sharpness: 5.0 / 4.0,
    };

    fn overlay(self, partial: PartialBarrier) -> Self {
        Self {
            height: partial.height.unwrap_or(self.height),
            center: partial.center.unwrap_or(self.center),
            sharpness: partial.sharpness.unwrap_or(self.sharpness),
        }
    }
}

/// A barrier table as written in a file, where every key is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialBarrier {
    height: Option<f64>,
    center: Option<f64>,
    sharpness: Option<f64>,
}

fn right_barrier_or_default<'de, D>(deserializer: D) -> Result<BarrierParams, D::Error>
where
    D: Deserializer<'de>,
{
    PartialBarrier::deserialize(deserializer).map(|partial| BarrierParams::RIGHT.overlay(partial))
}

fn left_barrier_or_default<'de, D>(deserializer: D) -> Result<BarrierParams, D::Error>
where
    D: Deserializer<'de>,
{
    PartialBarrier::deserialize(deserializer).map(|partial| BarrierParams::LEFT.overlay(partial))
}

/// Coefficients of the two-barrier surface.
///
/// The defaults reproduce
/// `V = -120·g(y) + 20·g(y)·exp(-2(x-2)²/4) + 50·g(y)·exp(-5(x+2)²/4) + 1000·z²`
/// with `g(y) = exp(-0.5·y²)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct SurfaceParams {
    /// Depth of the channel along y, in kJ/mol.
    pub well_depth: f64,
    /// Coefficient `w` in `g(y) = exp(-w·y²)`, in nm⁻².
    pub well_width: f64,
    /// Stiffness `k` of the `k·z²` restraint, in kJ/(mol·nm²).
    pub confinement: f64,
    /// Omitted keys fall back to [`BarrierParams::RIGHT`].
    #[serde(deserialize_with = "right_barrier_or_default")]
    pub right_barrier: BarrierParams,
    /// Omitted keys fall back to [`BarrierParams::LEFT`].
    #[serde(deserialize_with = "left_barrier_or_default")]
    pub left_barrier: BarrierParams,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            well_depth: 120.0,
            well_width: 0.5,
            confinement: 1000.0,
            right_barrier: BarrierParams::RIGHT,
            left_barrier: BarrierParams::LEFT,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid surface parameter '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl SurfaceParams {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let params: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects coefficients that would make the surface non-finite or unbounded below
    /// along z.
    pub fn validate(&self) -> Result<(), ParamLoadError> {
        let finite = [
            ("well-depth", self.well_depth),
            ("well-width", self.well_width),
            ("right-barrier.height", self.right_barrier.height),
            ("right-barrier.center", self.right_barrier.center),
            ("right-barrier.sharpness", self.right_barrier.sharpness),
            ("left-barrier.height", self.left_barrier.height),
            ("left-barrier.center", self.left_barrier.center),
            ("left-barrier.sharpness", self.left_barrier.sharpness),
            ("confinement", self.confinement),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ParamLoadError::Invalid {
                    name,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        if self.well_width < 0.0 {
            return Err(ParamLoadError::Invalid {
                name: "well-width",
                reason: "must not be negative".to_string(),
            });
        }
        if self.confinement < 0.0 {
            return Err(ParamLoadError::Invalid {
                name: "confinement",
                reason: "must not be negative".to_string(),
            });
        }
        for (name, barrier) in [
            ("right-barrier.sharpness", &self.right_barrier),
            ("left-barrier.sharpness", &self.left_barrier),
        ] {
            if barrier.sharpness < 0.0 {
                return Err(ParamLoadError::Invalid {
                    name,
                    reason: "must not be negative".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Barrier centres along x as `(lower, upper)`.
    pub fn barrier_centers(&self) -> (f64, f64) {
        let a = self.left_barrier.center;
        let b = self.right_barrier.center;
        if a <= b { (a, b) } else { (b, a) }
    }
}
