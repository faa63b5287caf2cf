/// Symbolic rendering of a program.
///
/// Replays the steps on a stack of strings and prints one line per step,
/// showing the expression that ends up on top of the stack.
pub mod trace;

use std::fmt::Display;

use ordered_float::OrderedFloat;

use crate::{
    error::{CompileError, CompileResult},
    interpreter::{
        function::core::{BinaryFunction, UnaryFunction},
        symbols::ExternalCell,
    },
};

/// Deepest evaluation stack a program may need.
///
/// The evaluator keeps its stack in a fixed array of this size, so programs
/// are rejected at build time if they would need more.
pub const MAX_STACK_DEPTH: usize = 256;

/// Scalar arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Arithmetic on operand groups of known width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorOp {
    /// Component-wise `+`, broadcasting scalars.
    Add,
    /// Component-wise `-`, broadcasting scalars.
    Sub,
    /// Vector times scalar, in that stack order.
    VecScalarMul,
    /// Scalar times vector, in that stack order.
    ScalarVecMul,
    /// Dot product of two vectors.
    Dot,
    /// Vector divided by scalar.
    VecScalarDiv,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `==`
    Equal,
}

/// Binary boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// One instruction of a [`Program`].
///
/// Each variant carries exactly the payload its opcode needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Push an immediate value.
    Constant(OrderedFloat<f64>),
    /// Push the imaginary unit.
    Imaginary,
    /// Push input element `slot` (1-based).
    Argument(usize),
    /// Push the current value of an external cell.
    External {
        /// The name the cell was referenced by.
        name: String,
        /// The cell.
        cell: ExternalCell,
    },
    /// Pop one value, push the function applied to it.
    Call(UnaryFunction),
    /// Pop two values, push the function applied to them.
    CallBinary(BinaryFunction),
    /// Pop one value, push its negation.
    Negate,
    /// Pop two scalars, push the result.
    Arithmetic(ArithmeticOp),
    /// Pop a right group of width `right` and a left group of width `left`,
    /// push the resulting group.
    Vector {
        /// The operation.
        op:    VectorOp,
        /// Width of the left operand.
        left:  usize,
        /// Width of the right operand.
        right: usize,
    },
    /// Pop two scalars, push `1` or `0`.
    Compare(CompareOp),
    /// Pop two scalars, push `1` or `0`.
    Logic(LogicOp),
    /// Pop one scalar, push `1` or `0`.
    Not,
    /// Stop evaluation.
    End,
}

/// An operation without input payload, for building programs by hand.
///
/// See [`crate::EvalFunction::append_operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Push the imaginary unit.
    Imaginary,
    /// Negate the top value.
    Negate,
    /// Scalar arithmetic.
    Arithmetic(ArithmeticOp),
    /// Arithmetic on operand groups.
    Vector {
        /// The operation.
        op:    VectorOp,
        /// Width of the left operand.
        left:  usize,
        /// Width of the right operand.
        right: usize,
    },
    /// Comparison.
    Compare(CompareOp),
    /// `and` / `or`.
    Logic(LogicOp),
    /// `not`.
    Not,
    /// End of program.
    End,
}

impl From<Operation> for Step {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Imaginary => Self::Imaginary,
            Operation::Negate => Self::Negate,
            Operation::Arithmetic(op) => Self::Arithmetic(op),
            Operation::Vector { op, left, right } => Self::Vector { op, left, right },
            Operation::Compare(op) => Self::Compare(op),
            Operation::Logic(op) => Self::Logic(op),
            Operation::Not => Self::Not,
            Operation::End => Self::End,
        }
    }
}

impl VectorOp {
    /// Width of the group produced from operands of width `left` and `right`.
    #[must_use]
    pub const fn result_width(self, left: usize, right: usize) -> usize {
        match self {
            Self::Add | Self::Sub => {
                if left > right {
                    left
                } else {
                    right
                }
            },
            Self::VecScalarMul | Self::VecScalarDiv => left,
            Self::ScalarVecMul => right,
            Self::Dot => 1,
        }
    }

    /// Whether operands of width `left` and `right` fit the operation.
    const fn accepts(self, left: usize, right: usize) -> bool {
        if left == 0 || right == 0 {
            return false;
        }
        match self {
            Self::Add | Self::Sub | Self::Dot => true,
            Self::VecScalarMul | Self::VecScalarDiv => right == 1,
            Self::ScalarVecMul => left == 1,
        }
    }
}

impl Step {
    /// Creates a constant step.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Constant(OrderedFloat(value))
    }

    /// Number of values the step pops and pushes.
    #[must_use]
    pub const fn stack_effect(&self) -> (usize, usize) {
        match self {
            Self::Constant(_) | Self::Imaginary | Self::Argument(_) | Self::External { .. } => (0, 1),
            Self::Call(_) | Self::Negate | Self::Not => (1, 1),
            Self::CallBinary(_) | Self::Arithmetic(_) | Self::Compare(_) | Self::Logic(_) => (2, 1),
            Self::Vector { op, left, right } => (*left + *right, op.result_width(*left, *right)),
            Self::End => (0, 0),
        }
    }

    /// Returns `true` if the step reads the caller's inputs or an external
    /// cell.
    #[must_use]
    pub const fn reads_input(&self) -> bool {
        matches!(self, Self::Argument(_) | Self::External { .. })
    }

    /// Short name of the opcode.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Constant(_) => "const",
            Self::Imaginary => "imag",
            Self::Argument(_) => "arg",
            Self::External { .. } => "extern",
            Self::Call(_) => "call",
            Self::CallBinary(_) => "call2",
            Self::Negate => "neg",
            Self::Arithmetic(op) => match op {
                ArithmeticOp::Add => "add",
                ArithmeticOp::Sub => "sub",
                ArithmeticOp::Mul => "mul",
                ArithmeticOp::Div => "div",
            },
            Self::Vector { op, .. } => match op {
                VectorOp::Add => "vadd",
                VectorOp::Sub => "vsub",
                VectorOp::VecScalarMul => "vsmul",
                VectorOp::ScalarVecMul => "svmul",
                VectorOp::Dot => "dot",
                VectorOp::VecScalarDiv => "vsdiv",
            },
            Self::Compare(op) => match op {
                CompareOp::Greater => "gt",
                CompareOp::Less => "lt",
                CompareOp::GreaterEqual => "ge",
                CompareOp::LessEqual => "le",
                CompareOp::Equal => "eq",
            },
            Self::Logic(LogicOp::And) => "and",
            Self::Logic(LogicOp::Or) => "or",
            Self::Not => "not",
            Self::End => "end",
        }
    }

    /// Checks the payload of the step.
    fn validate(&self) -> CompileResult<()> {
        match self {
            Self::Argument(0) => Err(CompileError::InvalidSlot { slot: 0 }),
            Self::Vector { op, left, right } if !op.accepts(*left, *right) => {
                Err(CompileError::InvalidVectorStep { step:  self.mnemonic(),
                                                      left:  *left,
                                                      right: *right, })
            },
            _ => Ok(()),
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.mnemonic();
        match self {
            Self::Constant(value) => write!(f, "{name} {value}"),
            Self::Argument(slot) => write!(f, "{name} {slot}"),
            Self::External { name: label, .. } => write!(f, "{name} {label}"),
            Self::Call(function) => write!(f, "{name} {}", function.name()),
            Self::CallBinary(function) => write!(f, "{name} {}", function.name()),
            Self::Vector { left, right, .. } => write!(f, "{name} {left}x{right}"),
            _ => write!(f, "{name}"),
        }
    }
}

/// Statically inferred shape of a compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultType {
    /// Number of values the expression produces.
    pub width:      usize,
    /// Whether the value is a truth value (`0` or `1`).
    pub is_bool:    bool,
    /// Whether the value may be complex.
    pub is_complex: bool,
}

impl Default for ResultType {
    fn default() -> Self {
        Self::scalar(false)
    }
}

impl ResultType {
    /// A single, possibly complex, number.
    #[must_use]
    pub const fn scalar(is_complex: bool) -> Self {
        Self { width: 1,
               is_bool: false,
               is_complex }
    }

    /// A single truth value.
    #[must_use]
    pub const fn boolean() -> Self {
        Self { width:      1,
               is_bool:    true,
               is_complex: false, }
    }

    /// A group of `width` numbers.
    #[must_use]
    pub const fn vector(width: usize, is_complex: bool) -> Self {
        Self { width,
               is_bool: false,
               is_complex }
    }

    /// Returns `true` if the expression produces more than one value.
    #[must_use]
    pub const fn is_vector(&self) -> bool {
        self.width > 1
    }
}

/// A compiled, reverse-Polish instruction sequence.
///
/// Steps can only be appended. Every append checks that the step finds the
/// values it pops and that the stack stays within [`MAX_STACK_DEPTH`], so a
/// program that was built without error never underflows during evaluation.
///
/// # Example
/// ```
/// use evalfunc::interpreter::program::{ArithmeticOp, Program, Step};
///
/// let mut program = Program::default();
/// program.push(Step::constant(2.0)).unwrap();
/// program.push(Step::Argument(1)).unwrap();
/// program.push(Step::Arithmetic(ArithmeticOp::Mul)).unwrap();
///
/// assert_eq!(program.len(), 3);
/// assert_eq!(program.depth(), 1);
/// assert!(program.reads_input());
///
/// // nothing left to add
/// assert!(program.push(Step::Arithmetic(ArithmeticOp::Add)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    steps:       Vec<Step>,
    depth:       usize,
    max_depth:   usize,
    reads_input: bool,
    ended:       bool,
}

impl Program {
    /// Appends a step.
    ///
    /// # Errors
    /// - `StackUnderflow` if the step pops more values than are available.
    /// - `StackOverflow` if the stack would exceed [`MAX_STACK_DEPTH`].
    /// - `InvalidSlot`, `InvalidVectorStep` for malformed payloads.
    /// - `ProgramEnded` if the program already ends with [`Step::End`].
    pub fn push(&mut self, step: Step) -> CompileResult<()> {
        if self.ended {
            return Err(CompileError::ProgramEnded { step: step.mnemonic() });
        }
        step.validate()?;

        let (pops, pushes) = step.stack_effect();
        if pops > self.depth {
            return Err(CompileError::StackUnderflow { step:      step.mnemonic(),
                                                      needed:    pops,
                                                      available: self.depth, });
        }
        let depth = self.depth - pops + pushes;
        if depth > MAX_STACK_DEPTH {
            return Err(CompileError::StackOverflow { depth,
                                                     limit: MAX_STACK_DEPTH });
        }

        self.depth = depth;
        self.max_depth = self.max_depth.max(depth);
        self.reads_input |= step.reads_input();
        self.ended = matches!(step, Step::End);
        self.steps.push(step);
        Ok(())
    }

    /// The steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the program has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of values left on the stack after executing the program.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Largest stack depth reached while executing the program.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` if any step reads an argument slot or external cell.
    #[must_use]
    pub const fn reads_input(&self) -> bool {
        self.reads_input
    }

    /// Returns `true` if the program ends with [`Step::End`].
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Removes all steps.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Maps component `index` of a group of `width` values to the component that
/// supplies it.
///
/// Scalars are broadcast to every component. Components past the end of a
/// shorter vector do not exist and read as zero.
#[must_use]
pub const fn broadcast_index(width: usize, index: usize) -> Option<usize> {
    if width == 1 {
        Some(0)
    } else if index < width {
        Some(index)
    } else {
        None
    }
}
