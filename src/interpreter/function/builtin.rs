use crate::interpreter::value::complex::ComplexNumber;

/// Returns the numeric sign of a value: `-1.0`, `0.0` or `1.0`.
///
/// # Example
/// ```
/// use evalfunc::interpreter::function::builtin::sign;
///
/// assert_eq!(sign(-42.0), -1.0);
/// assert_eq!(sign(0.0), 0.0);
/// assert_eq!(sign(3.5), 1.0);
/// ```
#[must_use]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Heaviside step: `1.0` for positive arguments, `0.0` otherwise.
///
/// # Example
/// ```
/// use evalfunc::interpreter::function::builtin::step;
///
/// assert_eq!(step(0.1), 1.0);
/// assert_eq!(step(0.0), 0.0);
/// assert_eq!(step(-2.0), 0.0);
/// ```
#[must_use]
pub fn step(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

/// Magnitude of a complex number, as a complex number.
#[must_use]
pub fn complex_abs(z: ComplexNumber) -> ComplexNumber {
    z.abs().into()
}
