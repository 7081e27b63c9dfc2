use super::export::ExportError;
use crate::core::forcefield::external::ExternalPotential;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Extent and resolution of a contour grid in the x/y plane.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct GridSpec {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Number of sample points along each axis, end points included.
    pub resolution: usize,
    /// Height of the slice through the surface.
    pub z: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x_min: -4.0,
            x_max: 4.0,
            y_min: -3.0,
            y_max: 3.0,
            resolution: 200,
            z: 0.0,
        }
    }
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), ExportError> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max, self.z];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(ExportError::InvalidGrid(
                "grid bounds must be finite".to_string(),
            ));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(ExportError::InvalidGrid(format!(
                "grid bounds must be increasing, got x [{}, {}] and y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        if self.resolution < 2 {
            return Err(ExportError::InvalidGrid(format!(
                "grid resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        Ok(())
    }
}

fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}

/// The potential evaluated on a regular grid. Energies are stored row-major with y as
/// the slow index.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    energies: Vec<f64>,
}

impl PotentialGrid {
    pub fn sample(potential: &dyn ExternalPotential, spec: &GridSpec) -> Result<Self, ExportError> {
        spec.validate()?;
        let xs = linspace(spec.x_min, spec.x_max, spec.resolution);
        let ys = linspace(spec.y_min, spec.y_max, spec.resolution);
        let z = spec.z;

        let evaluate_row = |&y: &f64| -> Vec<f64> {
            xs.iter()
                .map(|&x| potential.energy(&Point3::new(x, y, z)))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = ys.par_iter().map(evaluate_row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = ys.iter().map(evaluate_row).collect();

        Ok(Self {
            energies: rows.into_iter().flatten().collect(),
            xs,
            ys,
        })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn energy_at(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.xs.len() || iy >= self.ys.len() {
            return None;
        }
        self.energies.get(iy * self.xs.len() + ix).copied()
    }

    /// Iterates `(x, y, energy)` with x varying fastest.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let nx = self.xs.len();
        self.energies
            .iter()
            .enumerate()
            .map(move |(i, &e)| (self.xs[i % nx], self.ys[i / nx], e))
    }

    pub fn min(&self) -> f64 {
        self.energies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.energies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// `count` evenly spaced contour levels from the grid minimum up to `ceiling`
    /// (or the grid maximum). Clipping the top keeps the stiff z restraint and the
    /// empty far field from swallowing the colour range.
    pub fn contour_levels(&self, count: usize, ceiling: Option<f64>) -> Vec<f64> {
        let low = self.min();
        let high = ceiling.map_or(self.max(), |c| c.min(self.max()));
        match count {
            0 => Vec::new(),
            1 => vec![low],
            _ if high <= low => vec![low],
            _ => linspace(low, high, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::surface::TwoBarrierSurface;

    fn small_spec() -> GridSpec {
        GridSpec {
            x_min: -2.0,
            x_max: 2.0,
            y_min: -1.0,
            y_max: 1.0,
            resolution: 5,
            z: 0.0,
        }
    }

    #[test]
    fn linspace_includes_both_end_points() {
        let values = linspace(-1.0, 1.0, 5);
        assert_eq!(values, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn sample_evaluates_every_grid_point() {
        let surface = TwoBarrierSurface::default();
        let grid = PotentialGrid::sample(&surface, &small_spec()).unwrap();

        assert_eq!(grid.xs().len(), 5);
        assert_eq!(grid.ys().len(), 5);
        assert_eq!(grid.iter().count(), 25);

        let centre = grid.energy_at(2, 2).unwrap();
        assert!((centre - surface.energy(&Point3::origin())).abs() < 1e-12);

        let corner = grid.energy_at(4, 0).unwrap();
        assert!((corner - surface.energy(&Point3::new(2.0, -1.0, 0.0))).abs() < 1e-12);
        assert!(grid.energy_at(5, 0).is_none());
    }

    #[test]
    fn iter_visits_x_fastest() {
        let surface = TwoBarrierSurface::default();
        let grid = PotentialGrid::sample(&surface, &small_spec()).unwrap();
        let points: Vec<_> = grid.iter().take(6).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(points[0], (-2.0, -1.0));
        assert_eq!(points[4], (2.0, -1.0));
        assert_eq!(points[5], (-2.0, -0.5));
    }

    #[test]
    fn sample_rejects_degenerate_specs() {
        let surface = TwoBarrierSurface::default();
        let mut spec = small_spec();
        spec.resolution = 1;
        assert!(matches!(
            PotentialGrid::sample(&surface, &spec),
            Err(ExportError::InvalidGrid(_))
        ));

        let mut spec = small_spec();
        spec.x_max = spec.x_min;
        assert!(PotentialGrid::sample(&surface, &spec).is_err());

        let mut spec = small_spec();
        spec.y_min = f64::NAN;
        assert!(PotentialGrid::sample(&surface, &spec).is_err());
    }

    #[test]
    fn contour_levels_span_minimum_to_clipped_ceiling() {
        let surface = TwoBarrierSurface::default();
        let grid = PotentialGrid::sample(&surface, &GridSpec::default()).unwrap();
        let levels = grid.contour_levels(10, Some(0.0));

        assert_eq!(levels.len(), 10);
        assert!((levels[0] - grid.min()).abs() < 1e-12);
        assert!(levels[9] <= 0.0);
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
        assert!(grid.contour_levels(0, None).is_empty());
    }
}
