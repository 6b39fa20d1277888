//! Worked calculations shown next to the experiments
//!
//! These are the hand calculations a student would do on paper, with the same
//! rounded inputs. They are displayed, never fed back into the animation.

use std::f64::consts::PI;

use common::constants::{EPSILON_0, K_COULOMB, WATER_DIPOLE_MOMENT, WATER_MOLECULES_PER_ML};

/// Coulomb's law, F = k·|q₁·q₂| / r²
pub fn coulomb_force(q1: f64, q2: f64, r: f64) -> f64 {
    K_COULOMB * (q1 * q2).abs() / (r * r)
}

/// Force of a point charge on a dipole, F = |q·p·cos θ| / (4π·ε₀·r³)
pub fn dipole_force(q: f64, p: f64, theta: f64, r: f64) -> f64 {
    (q * p * theta.cos()).abs() / (4.0 * PI * EPSILON_0 * r.powi(3))
}

/// Balloon rubbed on hair next to a piece of paper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalloonExample {
    /// Balloon charge (C)
    pub q_balloon: f64,
    /// Charge induced on the paper (C)
    pub q_paper: f64,
    /// Separation (m)
    pub distance: f64,
}

impl Default for BalloonExample {
    fn default() -> Self {
        Self {
            q_balloon: -1.0e-9,
            q_paper: 5.0e-10,
            distance: 0.02,
        }
    }
}

impl BalloonExample {
    pub fn force(&self) -> f64 {
        coulomb_force(self.q_balloon, self.q_paper, self.distance)
    }
}

/// Ruler rubbed with wool next to a thin stream of water
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterExample {
    /// Ruler charge (C)
    pub q_ruler: f64,
    /// Separation (m)
    pub distance: f64,
    /// Angle between dipole and field (rad)
    pub theta: f64,
    /// Volume of water feeling the ruler (ml)
    pub volume_ml: f64,
}

impl Default for WaterExample {
    fn default() -> Self {
        Self {
            q_ruler: -2.0e-8,
            distance: 0.05,
            theta: 0.0,
            volume_ml: 0.1,
        }
    }
}

impl WaterExample {
    /// Force on a single molecule
    pub fn force_per_molecule(&self) -> f64 {
        dipole_force(self.q_ruler, WATER_DIPOLE_MOMENT, self.theta, self.distance)
    }

    pub fn molecules(&self) -> f64 {
        WATER_MOLECULES_PER_ML * self.volume_ml
    }

    /// Force summed over every molecule in the volume
    pub fn total_force(&self) -> f64 {
        self.force_per_molecule() * self.molecules()
    }
}

/// Scientific notation with superscript exponent, e.g. `1.125 × 10⁻⁵`
pub fn scientific(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let exponent = value.abs().log10().floor() as i32;
    let mantissa = value / 10f64.powi(exponent);
    let sup: String = exponent
        .to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            _ => '⁹',
        })
        .collect();

    format!("{mantissa:.digits$} × 10{sup}")
}
