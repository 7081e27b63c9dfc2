use super::external::ExternalPotential;
use super::params::{BarrierParams, SurfaceParams};
use nalgebra::{Point3, Vector3};

/// The two-barrier surface:
///
/// `V(x, y, z) = g(y)·(-D + Σ hᵢ·exp(-sᵢ·(x - cᵢ)²)) + k·z²`, `g(y) = exp(-w·y²)`.
///
/// With default parameters the channel along x sits at depth -120, crossed by a
/// broad 20 kJ/mol ridge at x = 2 and a narrow 50 kJ/mol ridge at x = -2. The z
/// coordinate is an auxiliary degree of freedom held near zero by a stiff restraint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TwoBarrierSurface {
    params: SurfaceParams,
}

/// Shared intermediate terms of one evaluation.
struct Terms {
    g: f64,
    right: f64,
    left: f64,
}

#[inline]
fn ridge(barrier: &BarrierParams, x: f64) -> f64 {
    let dx = x - barrier.center;
    (-barrier.sharpness * dx * dx).exp()
}

impl TwoBarrierSurface {
    pub fn new(params: SurfaceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Barrier centres along x as `(lower, upper)`.
    pub fn barrier_positions(&self) -> (f64, f64) {
        self.params.barrier_centers()
    }

    #[inline]
    fn terms(&self, x: f64, y: f64) -> Terms {
        Terms {
            g: (-self.params.well_width * y * y).exp(),
            right: ridge(&self.params.right_barrier, x),
            left: ridge(&self.params.left_barrier, x),
        }
    }

    /// Energy of the x/y profile (no z restraint) divided by `g(y)`.
    #[inline]
    fn profile(&self, t: &Terms) -> f64 {
        let p = &self.params;
        -p.well_depth + p.right_barrier.height * t.right + p.left_barrier.height * t.left
    }

    #[inline]
    fn energy_from_terms(&self, t: &Terms, z: f64) -> f64 {
        t.g * self.profile(t) + self.params.confinement * z * z
    }

    #[inline]
    fn gradient_from_terms(&self, t: &Terms, p: &Point3<f64>) -> Vector3<f64> {
        let params = &self.params;
        let r = &params.right_barrier;
        let l = &params.left_barrier;

        let dx = t.g
            * (-2.0 * r.sharpness * (p.x - r.center) * r.height * t.right
                - 2.0 * l.sharpness * (p.x - l.center) * l.height * t.left);
        let dy = -2.0 * params.well_width * p.y * t.g * self.profile(t);
        let dz = 2.0 * params.confinement * p.z;

        Vector3::new(dx, dy, dz)
    }
}

impl ExternalPotential for TwoBarrierSurface {
    #[inline]
    fn energy(&self, position: &Point3<f64>) -> f64 {
        let t = self.terms(position.x, position.y);
        self.energy_from_terms(&t, position.z)
    }

    #[inline]
    fn gradient(&self, position: &Point3<f64>) -> Vector3<f64> {
        let t = self.terms(position.x, position.y);
        self.gradient_from_terms(&t, position)
    }

    #[inline]
    fn energy_and_force(&self, position: &Point3<f64>) -> (f64, Vector3<f64>) {
        let t = self.terms(position.x, position.y);
        (
            self.energy_from_terms(&t, position.z),
            -self.gradient_from_terms(&t, position),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    /// Direct transcription of the closed form, kept independent of the parameter struct.
    fn reference_energy(x: f64, y: f64, z: f64) -> f64 {
        let g = (-0.5 * y * y).exp();
        -120.0 * g
            + 20.0 * g * (-2.0 * (x - 2.0).powi(2) / 4.0).exp()
            + 50.0 * g * (-5.0 * (x + 2.0).powi(2) / 4.0).exp()
            + 1000.0 * z * z
    }

    fn numerical_gradient(surface: &TwoBarrierSurface, p: &Point3<f64>) -> Vector3<f64> {
        let h = 1e-6;
        let mut grad = Vector3::zeros();
        for axis in 0..3 {
            let mut plus = *p;
            let mut minus = *p;
            plus[axis] += h;
            minus[axis] -= h;
            grad[axis] = (surface.energy(&plus) - surface.energy(&minus)) / (2.0 * h);
        }
        grad
    }

    #[test]
    fn energy_at_origin_matches_closed_form() {
        let surface = TwoBarrierSurface::default();
        let expected = -120.0 + 20.0 * (-2.0f64).exp() + 50.0 * (-5.0f64).exp();
        assert!(f64_approx_equal(
            surface.energy(&Point3::origin()),
            expected
        ));
    }

    #[test]
    fn energy_matches_reference_formula_across_the_plane() {
        let surface = TwoBarrierSurface::default();
        for &(x, y, z) in &[
            (0.0, 0.0, 0.0),
            (2.0, 0.0, 0.0),
            (-2.0, 0.3, 0.0),
            (1.3, -1.7, 0.05),
            (-4.5, 2.2, -0.1),
            (10.0, 0.0, 0.0),
        ] {
            let energy = surface.energy(&Point3::new(x, y, z));
            assert!(
                f64_approx_equal(energy, reference_energy(x, y, z)),
                "mismatch at ({}, {}, {})",
                x,
                y,
                z
            );
        }
    }

    #[test]
    fn barrier_tops_sit_above_the_channel_floor() {
        let surface = TwoBarrierSurface::default();
        let floor = surface.energy(&Point3::new(0.0, 0.0, 0.0));
        let right = surface.energy(&Point3::new(2.0, 0.0, 0.0));
        let left = surface.energy(&Point3::new(-2.0, 0.0, 0.0));
        assert!(right > floor);
        assert!(left > right);
        assert!(f64_approx_equal(right, -100.0 + 50.0 * (-20.0f64).exp()));
    }

    #[test]
    fn energy_is_symmetric_in_the_sign_of_z() {
        let surface = TwoBarrierSurface::default();
        for &z in &[0.01, 0.1, 0.5, 3.0] {
            let up = surface.energy(&Point3::new(0.7, -0.4, z));
            let down = surface.energy(&Point3::new(0.7, -0.4, -z));
            assert!(f64_approx_equal(up, down));
        }
    }

    #[test]
    fn energy_decays_to_zero_far_along_y() {
        let surface = TwoBarrierSurface::default();
        for &x in &[-2.0, 0.0, 2.0, 5.0] {
            let near = surface.energy(&Point3::new(x, 1.0, 0.0)).abs();
            let far = surface.energy(&Point3::new(x, 10.0, 0.0)).abs();
            assert!(far < near);
            assert!(far < 1e-18);
        }
    }

    #[test]
    fn analytic_gradient_matches_finite_differences() {
        let surface = TwoBarrierSurface::default();
        for &(x, y, z) in &[
            (0.0, 0.0, 0.0),
            (1.9, 0.4, 0.02),
            (-2.2, -0.8, -0.01),
            (3.5, 1.5, 0.1),
            (-0.5, 2.5, 0.0),
        ] {
            let p = Point3::new(x, y, z);
            let analytic = surface.gradient(&p);
            let numeric = numerical_gradient(&surface, &p);
            assert!(
                (analytic - numeric).norm() < 1e-4,
                "gradient mismatch at {:?}: {:?} vs {:?}",
                p,
                analytic,
                numeric
            );
        }
    }

    #[test]
    fn energy_and_force_agrees_with_separate_evaluations() {
        let surface = TwoBarrierSurface::default();
        let p = Point3::new(-1.1, 0.6, 0.03);
        let (energy, force) = surface.energy_and_force(&p);
        assert!(f64_approx_equal(energy, surface.energy(&p)));
        assert!((force + surface.gradient(&p)).norm() < TOLERANCE);
    }

    #[test]
    fn force_points_back_toward_z_zero() {
        let surface = TwoBarrierSurface::default();
        let force = surface.force(&Point3::new(0.0, 0.0, 0.1));
        assert!(f64_approx_equal(force.z, -200.0));
    }

    #[test]
    fn gradient_vanishes_at_channel_centre_line_along_y() {
        let surface = TwoBarrierSurface::default();
        let grad = surface.gradient(&Point3::new(0.3, 0.0, 0.0));
        assert!(f64_approx_equal(grad.y, 0.0));
        assert!(f64_approx_equal(grad.z, 0.0));
    }

    #[test]
    fn custom_parameters_change_the_surface() {
        let mut params = SurfaceParams::default();
        params.confinement = 0.0;
        params.right_barrier.height = 0.0;
        params.left_barrier.height = 0.0;
        let surface = TwoBarrierSurface::new(params);
        assert!(f64_approx_equal(
            surface.energy(&Point3::new(2.0, 0.0, 5.0)),
            -120.0
        ));
        assert_eq!(surface.barrier_positions(), (-2.0, 2.0));
    }
}
