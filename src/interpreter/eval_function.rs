use std::{io::Read, str::FromStr};

use tracing::{debug, instrument, trace};

use crate::{
    error::{CompileError, CompileResult, DegradedReport},
    interpreter::{
        evaluator::core::{DEFAULT_TOLERANCE, Machine},
        function::core::{BinaryFunction, FunctionRegistry, UnaryFunction},
        parser,
        program::{MAX_STACK_DEPTH, Operation, Program, ResultType, Step},
        symbols::{Argument, ExternalCell, SymbolTables, validate_name},
        value::{complex::ComplexNumber, scalar::Scalar},
    },
};

/// A compiled formula together with everything its names resolve to.
///
/// Usage has two phases. First names are registered and a source string is
/// compiled with [`parse`](Self::parse), through `&mut self`. Then the
/// program is evaluated any number of times through `&self`, in the real or
/// the complex domain. Evaluation never allocates and never fails; a unit can
/// be shared between threads once compiled.
///
/// # Example
/// ```
/// use evalfunc::{EvalFunction, ExternalCell};
///
/// let time = ExternalCell::new(0.0);
///
/// let mut f = EvalFunction::new();
/// f.define_argument("x", 1, 1, false).unwrap();
/// f.define_external("t", &time).unwrap();
/// f.parse("x * t + 1").unwrap();
///
/// assert_eq!(f.eval(&[3.0]), 1.0);
/// time.set(2.0);
/// assert_eq!(f.eval(&[3.0]), 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct EvalFunction {
    program:     Program,
    result_type: ResultType,
    symbols:     SymbolTables,
    functions:   FunctionRegistry,
    tolerance:   f64,
}

impl Default for EvalFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for EvalFunction {
    type Err = CompileError;

    /// Compiles a formula that uses only literals, `pi`, `I` and the standard
    /// functions.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut function = Self::new();
        function.parse(source)?;
        Ok(function)
    }
}

impl EvalFunction {
    /// Creates an empty unit with the standard functions, the constant `pi`
    /// and the default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self { program:     Program::default(),
               result_type: ResultType::default(),
               symbols:     SymbolTables::new(),
               functions:   FunctionRegistry::standard(),
               tolerance:   DEFAULT_TOLERANCE, }
    }

    /// Sets the tolerance used for truthiness and comparisons.
    ///
    /// A value is true iff it is greater than the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Replaces the functions formulas can call.
    #[must_use]
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// The truthiness tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The registered names.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTables {
        &self.symbols
    }

    /// The functions formulas can call.
    #[must_use]
    pub const fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Registers a named constant. Its value is copied into the program at
    /// compile time.
    ///
    /// # Errors
    /// `InvalidDefinition` if the name is not an identifier or is a keyword.
    pub fn define_constant(&mut self, name: &str, value: f64) -> CompileResult<()> {
        validate_name(name)?;
        self.symbols.constants.set(name, value);
        trace!(name, value, "constant defined");
        Ok(())
    }

    /// Registers an external cell under `name`.
    ///
    /// The program keeps a handle to the cell and reads it at every
    /// evaluation, so later writes through `cell` are seen by later
    /// evaluations.
    ///
    /// # Errors
    /// `InvalidDefinition` if the name is not an identifier or is a keyword.
    pub fn define_external(&mut self, name: &str, cell: &ExternalCell) -> CompileResult<()> {
        validate_name(name)?;
        self.symbols.externals.set(name, cell.clone());
        trace!(name, value = cell.get(), "external defined");
        Ok(())
    }

    /// Declares an argument occupying input slots `slot..slot + width`.
    ///
    /// # Parameters
    /// - `name`: The name formulas use.
    /// - `slot`: 1-based index of the first input slot.
    /// - `width`: Number of slots; a width above 1 makes a vector.
    /// - `is_complex`: Whether the argument is complex valued.
    ///
    /// # Errors
    /// `InvalidDefinition` if the name is invalid, `slot` is `0`, or `width`
    /// is `0` or larger than the evaluation stack.
    ///
    /// # Example
    /// ```
    /// use evalfunc::EvalFunction;
    ///
    /// let mut f = EvalFunction::new();
    /// f.define_argument("v", 1, 3, false).unwrap();
    /// f.define_argument("s", 4, 1, false).unwrap();
    /// f.parse("v * s").unwrap();
    ///
    /// assert_eq!(f.dimension(), 3);
    /// assert_eq!(f.required_inputs(), 4);
    ///
    /// let mut out = [0.0; 3];
    /// f.eval_vector(&[1.0, 2.0, 3.0, 10.0], &mut out);
    /// assert_eq!(out, [10.0, 20.0, 30.0]);
    /// ```
    pub fn define_argument(&mut self,
                           name: &str,
                           slot: usize,
                           width: usize,
                           is_complex: bool)
                           -> CompileResult<()> {
        validate_name(name)?;
        let reason = if slot == 0 {
            Some("argument slots start at 1")
        } else if width == 0 {
            Some("argument width must be at least 1")
        } else if width > MAX_STACK_DEPTH {
            Some("argument is wider than the evaluation stack")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CompileError::InvalidDefinition { name: name.to_string(),
                                                         reason });
        }

        self.symbols.arguments.set(name,
                                   Argument { slot,
                                              width,
                                              is_complex });
        trace!(name, slot, width, is_complex, "argument defined");
        Ok(())
    }

    /// Compiles `source`, replacing any previous program.
    ///
    /// On failure no program is kept and [`is_compiled`](Self::is_compiled)
    /// returns `false`.
    ///
    /// # Errors
    /// Any tokenizer or parser error, with the line and column it occurred
    /// at.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&mut self, source: &str) -> CompileResult<()> {
        self.reset();
        let (program, result_type) = parser::core::parse(source, &self.symbols, &self.functions)?;

        debug!(steps = program.len(),
               max_depth = program.max_depth(),
               width = result_type.width,
               is_bool = result_type.is_bool,
               is_complex = result_type.is_complex,
               "compiled");
        self.program = program;
        self.result_type = result_type;
        Ok(())
    }

    /// Reads `reader` to the end and compiles the text.
    ///
    /// # Errors
    /// `Io` if reading fails, otherwise as [`parse`](Self::parse).
    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> CompileResult<()> {
        self.reset();
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.parse(&source)
    }

    /// Appends a constant step.
    ///
    /// The `append_*` methods build a program by hand, bypassing the parser.
    /// Each step is checked like a parsed one; a rejected step leaves the
    /// program unchanged.
    ///
    /// # Example
    /// ```
    /// use evalfunc::{
    ///     EvalFunction,
    ///     interpreter::program::{ArithmeticOp, Operation},
    /// };
    ///
    /// let mut f = EvalFunction::new();
    /// f.define_argument("x", 1, 1, false).unwrap();
    ///
    /// f.append_argument(1).unwrap();
    /// f.append_constant(4.0).unwrap();
    /// f.append_operation(Operation::Arithmetic(ArithmeticOp::Sub)).unwrap();
    ///
    /// assert_eq!(f.eval(&[10.0]), 6.0);
    /// assert!(f.append_operation(Operation::Arithmetic(ArithmeticOp::Add)).is_err());
    /// ```
    pub fn append_constant(&mut self, value: f64) -> CompileResult<()> {
        self.append(Step::constant(value), false)
    }

    /// Appends a step pushing input slot `slot` (1-based).
    ///
    /// The value counts as complex if a complex argument covers the slot.
    pub fn append_argument(&mut self, slot: usize) -> CompileResult<()> {
        let is_complex = self.symbols
                             .arguments
                             .iter()
                             .any(|(_, a)| a.is_complex && (a.slot..=a.last_slot()).contains(&slot));
        self.append(Step::Argument(slot), is_complex)
    }

    /// Appends a step pushing the current value of `cell`.
    ///
    /// `name` labels the cell in [`trace`](Self::trace) and need not be
    /// registered.
    pub fn append_external(&mut self, name: &str, cell: &ExternalCell) -> CompileResult<()> {
        self.append(Step::External { name: name.to_string(),
                                     cell: cell.clone(), },
                    false)
    }

    /// Appends an operation.
    pub fn append_operation(&mut self, operation: Operation) -> CompileResult<()> {
        self.append(operation.into(), operation == Operation::Imaginary)
    }

    /// Appends a call of a unary function.
    ///
    /// The function need not be registered.
    pub fn append_function(&mut self, function: UnaryFunction) -> CompileResult<()> {
        self.append(Step::Call(function), false)
    }

    /// Appends a call of a two-argument function.
    pub fn append_binary_function(&mut self, function: BinaryFunction) -> CompileResult<()> {
        self.append(Step::CallBinary(function), false)
    }

    fn append(&mut self, step: Step, is_complex: bool) -> CompileResult<()> {
        let is_bool = matches!(step, Step::Compare(_) | Step::Logic(_) | Step::Not);
        let ends = matches!(step, Step::End);
        self.program.push(step)?;
        if ends {
            return Ok(());
        }

        let depth = self.program.depth();
        self.result_type = ResultType { width:      depth.max(1),
                                        is_bool:    is_bool && depth == 1,
                                        is_complex: self.result_type.is_complex || is_complex, };
        Ok(())
    }

    fn reset(&mut self) {
        self.program.clear();
        self.result_type = ResultType::default();
    }

    /// Returns `true` if the unit holds a program.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        !self.program.is_empty()
    }

    /// Returns `true` if the result may be complex.
    #[must_use]
    pub const fn is_complex(&self) -> bool {
        self.result_type.is_complex
    }

    /// Returns `true` if the result is a truth value.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        self.result_type.is_bool
    }

    /// Returns `true` if the program reads neither arguments nor external
    /// cells, so every evaluation yields the same value.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        !self.program.reads_input()
    }

    /// Number of values an evaluation produces.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.result_type.width
    }

    /// The inferred shape of the result.
    #[must_use]
    pub const fn result_type(&self) -> ResultType {
        self.result_type
    }

    /// Number of input slots the declared arguments need.
    #[must_use]
    pub fn required_inputs(&self) -> usize {
        self.symbols.required_inputs()
    }

    /// The compiled program.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// A step-by-step listing of the program with symbolic stack values.
    #[must_use]
    pub fn trace(&self) -> String {
        self.program.to_string()
    }

    /// Evaluates in the real domain and returns the first result component.
    ///
    /// An empty program evaluates to `0`.
    ///
    /// # Panics
    /// Panics if `input` is shorter than a slot the program reads.
    #[must_use]
    pub fn eval(&self, input: &[f64]) -> f64 {
        self.eval_with_report(input).0
    }

    /// Like [`eval`](Self::eval), also returning what was degraded.
    ///
    /// # Panics
    /// Panics if `input` is shorter than a slot the program reads.
    #[must_use]
    pub fn eval_with_report(&self, input: &[f64]) -> (f64, DegradedReport) {
        self.evaluate_scalar(input)
    }

    /// Evaluates in the real domain and writes the
    /// [`dimension`](Self::dimension) result components to `output`.
    ///
    /// # Panics
    /// Panics if `input` is shorter than a slot the program reads, or
    /// `output` is shorter than the dimension.
    pub fn eval_vector(&self, input: &[f64], output: &mut [f64]) {
        self.eval_vector_with_report(input, output);
    }

    /// Like [`eval_vector`](Self::eval_vector), also returning what was
    /// degraded.
    ///
    /// # Panics
    /// As [`eval_vector`](Self::eval_vector).
    pub fn eval_vector_with_report(&self, input: &[f64], output: &mut [f64]) -> DegradedReport {
        self.evaluate_into(input, output)
    }

    /// Evaluates in the complex domain and returns the first result
    /// component.
    ///
    /// # Example
    /// ```
    /// use evalfunc::{ComplexNumber, EvalFunction};
    ///
    /// let mut f = EvalFunction::new();
    /// f.define_argument("z", 1, 1, true).unwrap();
    /// f.parse("z * z").unwrap();
    ///
    /// assert!(f.is_complex());
    /// assert_eq!(f.eval_complex(&[ComplexNumber::new(0.0, 1.0)]),
    ///            ComplexNumber::new(-1.0, 0.0));
    /// ```
    ///
    /// # Panics
    /// Panics if `input` is shorter than a slot the program reads.
    #[must_use]
    pub fn eval_complex(&self, input: &[ComplexNumber]) -> ComplexNumber {
        self.eval_complex_with_report(input).0
    }

    /// Like [`eval_complex`](Self::eval_complex), also returning what was
    /// degraded.
    ///
    /// # Panics
    /// Panics if `input` is shorter than a slot the program reads.
    #[must_use]
    pub fn eval_complex_with_report(&self,
                                    input: &[ComplexNumber])
                                    -> (ComplexNumber, DegradedReport) {
        self.evaluate_scalar(input)
    }

    /// Evaluates in the complex domain and writes the result components to
    /// `output`.
    ///
    /// # Panics
    /// Panics if `input` is shorter than a slot the program reads, or
    /// `output` is shorter than the dimension.
    pub fn eval_complex_vector(&self, input: &[ComplexNumber], output: &mut [ComplexNumber]) {
        self.eval_complex_vector_with_report(input, output);
    }

    /// Like [`eval_complex_vector`](Self::eval_complex_vector), also
    /// returning what was degraded.
    ///
    /// # Panics
    /// As [`eval_complex_vector`](Self::eval_complex_vector).
    pub fn eval_complex_vector_with_report(&self,
                                           input: &[ComplexNumber],
                                           output: &mut [ComplexNumber])
                                           -> DegradedReport {
        self.evaluate_into(input, output)
    }

    fn run<T: Scalar>(&self, input: &[T]) -> Machine<T> {
        let mut machine = Machine::new(self.tolerance);
        machine.run(&self.program, input);
        machine.report().log();
        machine
    }

    /// The last `dimension` values on the stack.
    fn result<'m, T: Scalar>(&self, machine: &'m Machine<T>) -> &'m [T] {
        let values = machine.values();
        &values[values.len().saturating_sub(self.dimension())..]
    }

    fn evaluate_scalar<T: Scalar>(&self, input: &[T]) -> (T, DegradedReport) {
        let machine = self.run(input);
        let value = self.result(&machine).first().copied().unwrap_or(T::ZERO);
        (value, machine.report())
    }

    fn evaluate_into<T: Scalar>(&self, input: &[T], output: &mut [T]) -> DegradedReport {
        let machine = self.run(input);
        let values = self.result(&machine);
        output[..values.len()].copy_from_slice(values);
        machine.report()
    }
}
