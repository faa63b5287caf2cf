use std::f64::consts::FRAC_2_PI;

const FRAC_PI_4: f64 = std::f64::consts::FRAC_PI_4;
const FRAC_3PI_4: f64 = 3.0 * std::f64::consts::FRAC_PI_4;

/// Bessel function of the first kind, order 0.
///
/// # Example
/// ```
/// use evalfunc::util::bessel::j0;
///
/// assert!((j0(0.0) - 1.0).abs() < 1e-8);
/// // first zero of J0
/// assert!(j0(2.404_825_557_695_773).abs() < 1e-7);
/// ```
#[must_use]
pub fn j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = 57_568_490_574.0
                  + y * (-13_362_590_354.0
                         + y * (651_619_640.7
                                + y * (-11_214_424.18 + y * (77_392.330_17 + y * (-184.905_245_6)))));
        let den = 57_568_490_411.0
                  + y * (1_029_532_985.0
                         + y * (9_494_680.718 + y * (59_272.648_53 + y * (267.853_271_2 + y))));
        num / den
    } else {
        let (p, q) = asymptotic_0(ax);
        let xx = ax - FRAC_PI_4;
        (FRAC_2_PI / ax).sqrt() * (xx.cos() * p - 8.0 / ax * xx.sin() * q)
    }
}

/// Bessel function of the first kind, order 1.
#[must_use]
pub fn j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = x
                  * (72_362_614_232.0
                     + y * (-7_895_059_235.0
                            + y * (242_396_853.1
                                   + y * (-2_972_611.439 + y * (15_704.482_60 + y * (-30.160_366_06))))));
        let den = 144_725_228_442.0
                  + y * (2_300_535_178.0
                         + y * (18_583_304.74 + y * (99_447.433_94 + y * (376.999_139_7 + y))));
        num / den
    } else {
        let (p, q) = asymptotic_1(ax);
        let xx = ax - FRAC_3PI_4;
        let ans = (FRAC_2_PI / ax).sqrt() * (xx.cos() * p - 8.0 / ax * xx.sin() * q);
        if x < 0.0 { -ans } else { ans }
    }
}

/// Bessel function of the second kind, order 0.
///
/// Returns NaN for negative arguments and negative infinity at zero.
#[must_use]
pub fn y0(x: f64) -> f64 {
    if x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return f64::NEG_INFINITY;
    }
    if x < 8.0 {
        let y = x * x;
        let num = -2_957_821_389.0
                  + y * (7_062_834_065.0
                         + y * (-512_359_803.6
                                + y * (10_879_881.29 + y * (-86_327.927_57 + y * 228.462_273_3))));
        let den = 40_076_544_269.0
                  + y * (745_249_964.8
                         + y * (7_189_466.438 + y * (47_447.264_70 + y * (226.103_024_4 + y))));
        num / den + FRAC_2_PI * j0(x) * x.ln()
    } else {
        let (p, q) = asymptotic_0(x);
        let xx = x - FRAC_PI_4;
        (FRAC_2_PI / x).sqrt() * (xx.sin() * p + 8.0 / x * xx.cos() * q)
    }
}

/// Bessel function of the second kind, order 1.
///
/// Returns NaN for negative arguments and negative infinity at zero.
#[must_use]
pub fn y1(x: f64) -> f64 {
    if x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return f64::NEG_INFINITY;
    }
    if x < 8.0 {
        let y = x * x;
        let num = x
                  * (-0.490_060_494_3e13
                     + y * (0.127_527_439_0e13
                            + y * (-0.515_343_813_9e11
                                   + y * (0.734_926_455_1e9
                                          + y * (-0.423_792_272_6e7 + y * 0.851_193_793_5e4)))));
        let den = 0.249_958_057_0e14
                  + y * (0.424_441_966_4e12
                         + y * (0.373_365_036_7e10
                                + y * (0.224_590_400_2e8 + y * (0.102_042_605_0e6 + y * (0.354_963_288_5e3 + y)))));
        num / den + FRAC_2_PI * (j1(x) * x.ln() - 1.0 / x)
    } else {
        let (p, q) = asymptotic_1(x);
        let xx = x - FRAC_3PI_4;
        (FRAC_2_PI / x).sqrt() * (xx.sin() * p + 8.0 / x * xx.cos() * q)
    }
}

/// Hankel asymptotic factors `P0`, `Q0` for `x >= 8`.
fn asymptotic_0(x: f64) -> (f64, f64) {
    let z = 8.0 / x;
    let y = z * z;
    let p = 1.0
            + y * (-0.109_862_862_7e-2
                   + y * (0.273_451_040_7e-4 + y * (-0.207_337_063_9e-5 + y * 0.209_388_721_1e-6)));
    let q = -0.156_249_999_5e-1
            + y * (0.143_048_876_5e-3
                   + y * (-0.691_114_765_1e-5 + y * (0.762_109_516_1e-6 - y * 0.934_945_152e-7)));
    (p, q)
}

/// Hankel asymptotic factors `P1`, `Q1` for `x >= 8`.
fn asymptotic_1(x: f64) -> (f64, f64) {
    let z = 8.0 / x;
    let y = z * z;
    let p = 1.0
            + y * (0.183_105e-2
                   + y * (-0.351_639_649_6e-4 + y * (0.245_752_017_4e-5 + y * (-0.240_337_019e-6))));
    let q = 0.046_874_999_95
            + y * (-0.200_269_087_3e-3
                   + y * (0.844_919_909_6e-5 + y * (-0.882_289_87e-6 + y * 0.105_787_412e-6)));
    (p, q)
}
