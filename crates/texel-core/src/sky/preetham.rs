//! Preetham, Shirley & Smits (1999) daylight model: zenith values and the
//! Perez luminance distribution.
//!
//! # Reference
//! - Preetham, Shirley, Smits, "A Practical Analytic Model for Daylight",
//!   SIGGRAPH 1999, appendix A.2
//! - Perez, Seals, Michalsky (1993), all-weather sky luminance distribution

use std::f32::consts::PI;

/// Perez coefficients `A..E` for luminance Y, each `[slope, intercept]` in turbidity.
const PEREZ_LUMINANCE: [[f32; 2]; 5] = [
    [0.1787, -1.4630],
    [-0.3554, 0.4275],
    [-0.0227, 5.3251],
    [0.1206, -2.5771],
    [-0.0670, 0.3703],
];

/// Perez coefficients for chromaticity x.
const PEREZ_X: [[f32; 2]; 5] = [
    [-0.0193, -0.2592],
    [-0.0665, 0.0008],
    [-0.0004, 0.2125],
    [-0.0641, -0.8989],
    [-0.0033, 0.0452],
];

/// Perez coefficients for chromaticity y.
const PEREZ_Y: [[f32; 2]; 5] = [
    [-0.0167, -0.2608],
    [-0.0950, 0.0092],
    [-0.0079, 0.2102],
    [-0.0441, -1.6537],
    [-0.0109, 0.0529],
];

/// Zenith chromaticity x: rows are the `T², T, 1` terms, columns `θs³, θs², θs, 1`.
const ZENITH_X: [[f32; 4]; 3] = [
    [0.00166, -0.00375, 0.00209, 0.0],
    [-0.02903, 0.06377, -0.03202, 0.00394],
    [0.11693, -0.21196, 0.06052, 0.25886],
];

/// Zenith chromaticity y, same layout as [`ZENITH_X`].
const ZENITH_Y: [[f32; 4]; 3] = [
    [0.00275, -0.00610, 0.00317, 0.0],
    [-0.04214, 0.08970, -0.04153, 0.00516],
    [0.15346, -0.26756, 0.06670, 0.26688],
];

/// Smallest `cos θ` fed to the Perez `B / cos θ` term.
const MIN_COS_THETA: f32 = 1e-4;

/// The five Perez coefficients of one channel.
pub(crate) type Perez = [f32; 5];

/// Perez coefficients at turbidity `t`, ordered `[Y, x, y]`.
pub(crate) fn perez_coefficients(t: f32) -> [Perez; 3] {
    [PEREZ_LUMINANCE, PEREZ_X, PEREZ_Y].map(|table| table.map(|[slope, icpt]| slope * t + icpt))
}

/// Perez distribution `F(θ, γ)` for view zenith cosine `cos_theta` and
/// angular distance `gamma` from the sun.
pub(crate) fn perez(coeffs: &Perez, cos_theta: f32, gamma: f32) -> f32 {
    let [a, b, c, d, e] = *coeffs;
    let cos_gamma = gamma.cos();
    (1.0 + a * (b / cos_theta.max(MIN_COS_THETA)).exp())
        * (1.0 + c * (d * gamma).exp() + e * cos_gamma * cos_gamma)
}

/// Zenith `[Y, x, y]` for turbidity `t` and sun zenith angle `theta_s`.
/// Luminance is in cd/m².
pub(crate) fn zenith(t: f32, theta_s: f32) -> [f32; 3] {
    let chi = (4.0 / 9.0 - t / 120.0) * (PI - 2.0 * theta_s);
    let luminance_kcd = (4.0453 * t - 4.9710) * chi.tan() - 0.2155 * t + 2.4192;
    [
        luminance_kcd * 1000.0,
        chromaticity(&ZENITH_X, t, theta_s),
        chromaticity(&ZENITH_Y, t, theta_s),
    ]
}

fn chromaticity(table: &[[f32; 4]; 3], t: f32, theta_s: f32) -> f32 {
    let powers_t = [t * t, t, 1.0];
    let powers_s = [theta_s * theta_s * theta_s, theta_s * theta_s, theta_s, 1.0];
    table
        .iter()
        .zip(powers_t)
        .map(|(row, pt)| pt * row.iter().zip(powers_s).map(|(m, ps)| m * ps).sum::<f32>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_zenith_luminance_reference_value() {
        // T = 3, θs = π/4: χ = 0.6588, Yz ≈ 7.32 kcd/m².
        let [y, _, _] = zenith(3.0, PI / 4.0);
        assert!((y - 7320.0).abs() < 5.0, "Yz = {y}");
    }

    #[test]
    fn test_zenith_at_horizon_sun_is_positive() {
        for t in [1.7, 3.0, 10.0] {
            let [y, x, yc] = zenith(t, FRAC_PI_2);
            assert!(y > 0.0, "T = {t}: Yz = {y}");
            assert!(x > 0.2 && x < 0.5 && yc > 0.2 && yc < 0.5, "T = {t}: ({x}, {yc})");
        }
    }

    #[test]
    fn test_zenith_chromaticity_overhead_sun() {
        // θs = 0 leaves only the constant column.
        let [_, x, y] = zenith(2.0, 0.0);
        let expect_x = 0.00394 * 2.0 + 0.25886;
        let expect_y = 0.00516 * 2.0 + 0.26688;
        assert!((x - expect_x).abs() < EPSILON);
        assert!((y - expect_y).abs() < EPSILON);
    }

    #[test]
    fn test_perez_brightens_towards_sun() {
        let [lum, _, _] = perez_coefficients(3.0);
        let near = perez(&lum, 0.7, 0.05);
        let far = perez(&lum, 0.7, 2.0);
        assert!(near > far, "{near} <= {far}");
    }

    #[test]
    fn test_perez_is_finite_at_horizon() {
        for coeffs in perez_coefficients(10.0) {
            let v = perez(&coeffs, 0.0, 1.0);
            assert!(v.is_finite());
        }
    }
}
