//! Turnover-frequency projection and rate-control scaling.

use nalgebra::DMatrix;
use sk_core::Real;

/// Project net reaction rates onto per-gas turnover frequencies through the
/// absolute gas stoichiometry matrix (reactions × gases):
/// `TOF_g = Σ_r |ν_rg| · net_r`.
pub fn project_tof(gas_matrix: &DMatrix<Real>, net_rates: &[Real]) -> Vec<Real> {
    (0..gas_matrix.ncols())
        .map(|g| {
            (0..gas_matrix.nrows())
                .map(|r| gas_matrix[(r, g)].abs() * net_rates[r])
                .sum()
        })
        .collect()
}

/// Scale a ∂TOF/∂G Jacobian (gases × energy coordinates) into the
/// dimensionless degree of rate control: row `i` is multiplied by
/// `−kB·T / TOF_i`.
pub fn rate_control_from_jacobian(
    dtof_dg: &DMatrix<Real>,
    tofs: &[Real],
    kbt: Real,
) -> DMatrix<Real> {
    let mut out = dtof_dg.clone();
    for (i, &tof) in tofs.iter().enumerate() {
        let scale = -kbt / tof;
        for j in 0..out.ncols() {
            out[(i, j)] *= scale;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dmatrix;

    #[test]
    fn projection_takes_absolute_coefficients() {
        // one reaction consuming a gas (ν = −1): TOF is the net rate itself
        let gas_matrix = dmatrix![-1.0];
        let tof = project_tof(&gas_matrix, &[0.25]);
        assert_eq!(tof, vec![0.25]);
    }

    #[test]
    fn projection_is_linear_in_net_rates() {
        let gas_matrix = dmatrix![-1.0, 0.0; 1.0, -2.0];
        let base = project_tof(&gas_matrix, &[0.5, 0.1]);
        let scaled = project_tof(&gas_matrix, &[1.5, 0.3]);
        for (b, s) in base.iter().zip(&scaled) {
            assert!((s - 3.0 * b).abs() < 1e-12);
        }
    }

    #[test]
    fn rate_control_scales_rows() {
        let j = dmatrix![2.0, 4.0; 1.0, 3.0];
        let dtrc = rate_control_from_jacobian(&j, &[2.0, 1.0], 0.05);
        assert!((dtrc[(0, 0)] - (-0.05 / 2.0 * 2.0)).abs() < 1e-12);
        assert!((dtrc[(1, 1)] - (-0.05 / 1.0 * 3.0)).abs() < 1e-12);
    }
}
