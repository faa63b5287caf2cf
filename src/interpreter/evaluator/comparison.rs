use crate::interpreter::{
    evaluator::core::Machine,
    program::{CompareOp, LogicOp},
    value::scalar::Scalar,
};

/// Tolerance-based truthiness: a value is true iff it exceeds `tolerance`.
///
/// Zero, negative values and NaN are false.
///
/// # Example
/// ```
/// use evalfunc::interpreter::evaluator::comparison::is_true;
///
/// assert!(is_true(1.0, 1e-14));
/// assert!(!is_true(1e-15, 1e-14));
/// assert!(!is_true(-3.0, 1e-14));
/// assert!(!is_true(f64::NAN, 1e-14));
/// ```
#[must_use]
pub fn is_true(value: f64, tolerance: f64) -> bool {
    value > tolerance
}

/// Compares two reals through their difference.
///
/// `a > b` holds iff `a - b` is true, `a >= b` holds iff `b > a` does not,
/// and `a == b` holds iff neither `a > b` nor `a < b`. Values closer than the
/// tolerance are therefore equal.
///
/// Every comparison with a NaN operand is false.
///
/// # Example
/// ```
/// use evalfunc::interpreter::{evaluator::comparison::compare, program::CompareOp};
///
/// let eps = 1e-14;
/// assert!(compare(CompareOp::Equal, 1.0, 1.0 + 1e-16, eps));
/// assert!(!compare(CompareOp::Greater, 1.0 + 1e-16, 1.0, eps));
/// assert!(compare(CompareOp::GreaterEqual, 1.0, 1.0, eps));
/// assert!(compare(CompareOp::Less, 1.0, 2.0, eps));
/// assert!(!compare(CompareOp::Equal, f64::NAN, f64::NAN, eps));
/// ```
#[must_use]
pub fn compare(op: CompareOp, a: f64, b: f64, tolerance: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let greater = is_true(a - b, tolerance);
    let less = is_true(b - a, tolerance);
    match op {
        CompareOp::Greater => greater,
        CompareOp::Less => less,
        CompareOp::GreaterEqual => !less,
        CompareOp::LessEqual => !greater,
        CompareOp::Equal => !greater && !less,
    }
}

fn truth_value<T: Scalar>(value: bool) -> T {
    if value { T::ONE } else { T::ZERO }
}

impl<T: Scalar> Machine<T> {
    /// Pops two values and pushes the comparison result as `1` or `0`.
    pub(crate) fn eval_compare(&mut self, op: CompareOp) {
        let b = self.pop().comparison_operand(&mut self.report);
        let a = self.pop().comparison_operand(&mut self.report);
        self.push(truth_value(compare(op, a, b, self.tolerance)));
    }

    /// Pops two values and pushes `a and b` or `a or b` as `1` or `0`.
    pub(crate) fn eval_logic(&mut self, op: LogicOp) {
        let b = is_true(self.pop().condition_operand(&mut self.report), self.tolerance);
        let a = is_true(self.pop().condition_operand(&mut self.report), self.tolerance);
        self.push(truth_value(match op {
                                  LogicOp::And => a && b,
                                  LogicOp::Or => a || b,
                              }));
    }

    /// Pops one value and pushes its negated truthiness.
    pub(crate) fn eval_not(&mut self) {
        let a = is_true(self.pop().condition_operand(&mut self.report), self.tolerance);
        self.push(truth_value(!a));
    }
}
