//! Unit system: lengths in nm, time in ps, masses in amu (g/mol), energies in kJ/mol
//! and temperatures in K. Velocities are therefore nm/ps and forces kJ/(mol·nm).

/// Molar Boltzmann constant in kJ/(mol·K).
pub const BOLTZMANN_KJ_PER_MOL_K: f64 = 0.008_314_462_618_153_24;

/// Thermal energy `kB·T` in kJ/mol.
#[inline]
pub fn thermal_energy(temperature: f64) -> f64 {
    BOLTZMANN_KJ_PER_MOL_K * temperature
}
