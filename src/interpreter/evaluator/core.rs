use crate::{
    error::DegradedReport,
    interpreter::{
        program::{ArithmeticOp, MAX_STACK_DEPTH, Program, Step},
        value::scalar::Scalar,
    },
};

/// Default tolerance for truthiness and comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-14;

/// Executes programs in one numeric domain.
///
/// The stack is a fixed array that lives wherever the machine lives, so an
/// evaluation never touches the heap. Programs are checked for depth when they
/// are built, so execution cannot overflow or underflow the stack.
///
/// A machine is cheap to create and is meant to be created per evaluation.
///
/// # Example
/// ```
/// use evalfunc::interpreter::{
///     evaluator::core::{DEFAULT_TOLERANCE, Machine},
///     program::{ArithmeticOp, Program, Step},
/// };
///
/// let mut program = Program::default();
/// program.push(Step::Argument(1)).unwrap();
/// program.push(Step::constant(3.0)).unwrap();
/// program.push(Step::Arithmetic(ArithmeticOp::Mul)).unwrap();
///
/// let mut machine = Machine::<f64>::new(DEFAULT_TOLERANCE);
/// machine.run(&program, &[2.0]);
///
/// assert_eq!(machine.values(), &[6.0]);
/// assert!(machine.report().is_clean());
/// ```
#[derive(Debug)]
pub struct Machine<T: Scalar> {
    pub(super) stack:     [T; MAX_STACK_DEPTH],
    pub(super) len:       usize,
    pub(super) tolerance: f64,
    pub(super) report:    DegradedReport,
}

impl<T: Scalar> Machine<T> {
    /// Creates a machine with an empty stack.
    ///
    /// # Parameters
    /// - `tolerance`: Values at or below it count as false.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { stack: [T::ZERO; MAX_STACK_DEPTH],
               len: 0,
               tolerance,
               report: DegradedReport::default() }
    }

    /// Executes `program` against `input`.
    ///
    /// Execution stops at the first [`Step::End`] or after the last step.
    /// The stack is cleared first, the degradation report is not.
    ///
    /// # Panics
    /// Panics if the program reads an argument slot past the end of `input`.
    pub fn run(&mut self, program: &Program, input: &[T]) {
        self.len = 0;
        for step in program.steps() {
            match step {
                Step::Constant(value) => self.push(T::from_real(value.0)),
                Step::Imaginary => {
                    let unit = T::imaginary_unit(&mut self.report);
                    self.push(unit);
                },
                Step::Argument(slot) => self.push(input[slot - 1]),
                Step::External { cell, .. } => self.push(T::from_real(cell.get())),
                Step::Call(function) => {
                    let a = self.pop();
                    let value = a.call(function, &mut self.report);
                    self.push(value);
                },
                Step::CallBinary(function) => {
                    let b = self.pop();
                    let a = self.pop();
                    let value = a.call_binary(b, function, &mut self.report);
                    self.push(value);
                },
                Step::Negate => {
                    let a = self.pop();
                    self.push(-a);
                },
                Step::Arithmetic(op) => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(match op {
                                  ArithmeticOp::Add => a + b,
                                  ArithmeticOp::Sub => a - b,
                                  ArithmeticOp::Mul => a * b,
                                  ArithmeticOp::Div => a / b,
                              });
                },
                Step::Vector { op, left, right } => self.eval_vector(*op, *left, *right),
                Step::Compare(op) => self.eval_compare(*op),
                Step::Logic(op) => self.eval_logic(*op),
                Step::Not => self.eval_not(),
                Step::End => break,
            }
        }
    }

    /// The values left on the stack, bottom first.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.stack[..self.len]
    }

    /// Degradations recorded so far.
    #[must_use]
    pub const fn report(&self) -> DegradedReport {
        self.report
    }

    /// The truthiness tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub(super) fn push(&mut self, value: T) {
        self.stack[self.len] = value;
        self.len += 1;
    }

    pub(super) fn pop(&mut self) -> T {
        self.len -= 1;
        self.stack[self.len]
    }
}
