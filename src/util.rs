/// Bessel functions of the first and second kind, orders 0 and 1.
///
/// The standard library has no special functions, so they are computed here
/// with rational approximations for small arguments and asymptotic
/// expansions for large ones. Absolute accuracy is around `1e-8`.
pub mod bessel;
