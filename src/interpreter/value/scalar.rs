use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::{
    error::{Degradation, DegradedReport},
    interpreter::{
        function::core::{BinaryFunction, UnaryFunction},
        value::complex::{self, ComplexNumber},
    },
};

/// A numeric domain a program can be evaluated in.
///
/// Implemented for `f64` (the real domain) and [`ComplexNumber`] (the complex
/// domain). Everything the evaluator needs beyond plain arithmetic goes
/// through this trait, including the points where a complex value has to be
/// reduced to a real one.
pub trait Scalar:
    Copy
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// Embeds a real number.
    fn from_real(value: f64) -> Self;

    /// The imaginary unit, or a substitute when the domain has none.
    fn imaginary_unit(report: &mut DegradedReport) -> Self;

    /// Reduces a comparison operand to a real number.
    ///
    /// Non-real values are replaced by `0.0`.
    fn comparison_operand(self, report: &mut DegradedReport) -> f64;

    /// Reduces an `and`/`or`/`not` operand to the real number whose
    /// truthiness is tested.
    fn condition_operand(self, report: &mut DegradedReport) -> f64;

    /// Applies a unary function.
    fn call(self, function: &UnaryFunction, report: &mut DegradedReport) -> Self;

    /// Applies a two-argument function.
    fn call_binary(self,
                   rhs: Self,
                   function: &BinaryFunction,
                   report: &mut DegradedReport)
                   -> Self;
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_real(value: f64) -> Self {
        value
    }

    fn imaginary_unit(report: &mut DegradedReport) -> Self {
        report.record(Degradation::ImaginaryInRealDomain);
        0.0
    }

    fn comparison_operand(self, _report: &mut DegradedReport) -> f64 {
        self
    }

    fn condition_operand(self, _report: &mut DegradedReport) -> f64 {
        self
    }

    fn call(self, function: &UnaryFunction, _report: &mut DegradedReport) -> Self {
        function.apply_real(self)
    }

    fn call_binary(self,
                   rhs: Self,
                   function: &BinaryFunction,
                   _report: &mut DegradedReport)
                   -> Self {
        function.apply_real(self, rhs)
    }
}

impl Scalar for ComplexNumber {
    const ZERO: Self = complex::ZERO;
    const ONE: Self = complex::ONE;

    fn from_real(value: f64) -> Self {
        value.into()
    }

    fn imaginary_unit(_report: &mut DegradedReport) -> Self {
        complex::I
    }

    fn comparison_operand(self, report: &mut DegradedReport) -> f64 {
        if self.is_real() {
            self.real
        } else {
            report.record(Degradation::ComplexComparison);
            0.0
        }
    }

    fn condition_operand(self, report: &mut DegradedReport) -> f64 {
        if !self.is_real() {
            report.record(Degradation::ComplexCondition);
        }
        self.real
    }

    fn call(self, function: &UnaryFunction, report: &mut DegradedReport) -> Self {
        if let Some(value) = function.apply_complex(self) {
            return value;
        }
        if !self.is_real() {
            report.record(Degradation::ComplexFunctionArgument { function: function.name() });
        }
        function.apply_real(self.real).into()
    }

    fn call_binary(self,
                   rhs: Self,
                   function: &BinaryFunction,
                   report: &mut DegradedReport)
                   -> Self {
        if !self.is_real() || !rhs.is_real() {
            report.record(Degradation::ComplexFunctionArgument { function: function.name() });
        }
        function.apply_real(self.real, rhs.real).into()
    }
}
