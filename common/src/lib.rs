//! Common utilities for the electrostatics demos
//!
//! This crate provides the shared window/GPU setup, the pixel-space camera and the
//! vertex helpers used by every widget renderer.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;

/// Physical constants quoted by the worked examples (SI units)
pub mod constants {
    /// Coulomb constant k in N·m²/C², rounded the way it is taught
    pub const K_COULOMB: f64 = 9.0e9;

    /// Vacuum permittivity ε₀ in F/m
    pub const EPSILON_0: f64 = 8.85e-12;

    /// Dipole moment of a water molecule in C·m
    pub const WATER_DIPOLE_MOMENT: f64 = 6.2e-30;

    /// Approximate number of water molecules per millilitre
    pub const WATER_MOLECULES_PER_ML: f64 = 3.3e22;
}
