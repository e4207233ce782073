//! Physical constants in the eV unit system used for surface energetics.

use crate::numeric::Real;

/// Boltzmann constant [eV/K]
pub const K_B: Real = 8.617332478e-5;

/// Planck constant [eV·s]
pub const H: Real = 4.135667516e-15;

/// Operating constants for one model evaluation.
///
/// Temperature is the only member that varies between runs; kB and h are
/// carried alongside so every component draws them from one place.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalConstants {
    /// Boltzmann constant [eV/K]
    pub kb: Real,
    /// Planck constant [eV·s]
    pub h: Real,
    /// Temperature [K]
    pub temperature: Real,
}

impl PhysicalConstants {
    pub fn at_temperature(temperature: Real) -> Self {
        Self {
            kb: K_B,
            h: H,
            temperature,
        }
    }

    /// Thermal energy kB·T [eV]
    pub fn kbt(&self) -> Real {
        self.kb * self.temperature
    }

    /// Eyring prefactor kB·T/h [1/s]
    pub fn prefactor(&self) -> Real {
        self.kb * self.temperature / self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefactor_magnitude_at_500k() {
        // kB·T/h at 500 K is on the order of 1e13 1/s
        let c = PhysicalConstants::at_temperature(500.0);
        let p = c.prefactor();
        assert!(p > 1e12 && p < 1e14, "prefactor = {p}");
    }

    #[test]
    fn kbt_at_room_temperature() {
        let c = PhysicalConstants::at_temperature(298.15);
        assert!((c.kbt() - 0.0257).abs() < 1e-3);
    }
}
