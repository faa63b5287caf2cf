use std::{borrow::Cow, ptr};

use crate::{
    interpreter::{function::builtin, value::complex::ComplexNumber},
    util::bessel,
};

/// A function of one numeric argument.
///
/// Every function has a real implementation. Functions that extend
/// naturally to complex numbers also carry a complex implementation; the
/// others are applied to the real part of a complex argument.
#[derive(Clone, Copy, Debug)]
pub struct UnaryFunction {
    name:    &'static str,
    real:    fn(f64) -> f64,
    complex: Option<fn(ComplexNumber) -> ComplexNumber>,
}

impl UnaryFunction {
    /// Creates a real-only function.
    ///
    /// # Example
    /// ```
    /// use evalfunc::interpreter::function::core::UnaryFunction;
    ///
    /// let square = UnaryFunction::new("square", |x| x * x);
    /// assert_eq!(square.apply_real(3.0), 9.0);
    /// assert!(square.apply_complex(2.0.into()).is_none());
    /// ```
    #[must_use]
    pub const fn new(name: &'static str, real: fn(f64) -> f64) -> Self {
        Self { name,
               real,
               complex: None }
    }

    /// Adds a complex implementation.
    #[must_use]
    pub const fn with_complex(self, complex: fn(ComplexNumber) -> ComplexNumber) -> Self {
        Self { complex: Some(complex),
               ..self }
    }

    /// The name the function is called by.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the function has a complex implementation.
    #[must_use]
    pub const fn has_complex(&self) -> bool {
        self.complex.is_some()
    }

    /// Applies the real implementation.
    #[must_use]
    pub fn apply_real(&self, x: f64) -> f64 {
        (self.real)(x)
    }

    /// Applies the complex implementation, if there is one.
    #[must_use]
    pub fn apply_complex(&self, z: ComplexNumber) -> Option<ComplexNumber> {
        self.complex.map(|f| f(z))
    }
}

/// Functions are equal if they share a name and their implementations are
/// the same functions.
impl PartialEq for UnaryFunction {
    fn eq(&self, other: &Self) -> bool {
        let same_complex = match (self.complex, other.complex) {
            (Some(a), Some(b)) => ptr::fn_addr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.name == other.name && ptr::fn_addr_eq(self.real, other.real) && same_complex
    }
}

/// A real function of two numeric arguments, such as `atan2`.
#[derive(Clone, Copy, Debug)]
pub struct BinaryFunction {
    name: &'static str,
    real: fn(f64, f64) -> f64,
}

impl BinaryFunction {
    /// Creates a two-argument function.
    #[must_use]
    pub const fn new(name: &'static str, real: fn(f64, f64) -> f64) -> Self {
        Self { name, real }
    }

    /// The name the function is called by.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the function.
    #[must_use]
    pub fn apply_real(&self, a: f64, b: f64) -> f64 {
        (self.real)(a, b)
    }
}

impl PartialEq for BinaryFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && ptr::fn_addr_eq(self.real, other.real)
    }
}

/// An entry of a [`FunctionRegistry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Builtin {
    /// Called with one argument.
    Unary(UnaryFunction),
    /// Called with two arguments.
    Binary(BinaryFunction),
}

impl Builtin {
    /// The name the function is called by.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unary(f) => f.name(),
            Self::Binary(f) => f.name(),
        }
    }

    /// Number of arguments a call must supply.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - its kind (`unary` or `binary`),
/// - the real implementation and, for unary functions, an optional complex
///   one.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (constant table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (@entry unary $name:literal, $real:expr) => {
        Builtin::Unary(UnaryFunction::new($name, $real))
    };
    (@entry unary $name:literal, $real:expr, $complex:expr) => {
        Builtin::Unary(UnaryFunction::new($name, $real).with_complex($complex))
    };
    (@entry binary $name:literal, $real:expr) => {
        Builtin::Binary(BinaryFunction::new($name, $real))
    };
    (
        $(
            $name:literal => $kind:ident($($func:expr),+ $(,)?)
        ),* $(,)?
    ) => {
        const BUILTIN_TABLE: &[Builtin] = &[
            $(
                builtin_functions!(@entry $kind $name, $($func),+),
            )*
        ];
        /// Names of all standard builtin functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "sin"      => unary(f64::sin, ComplexNumber::sin),
    "cos"      => unary(f64::cos, ComplexNumber::cos),
    "tan"      => unary(f64::tan, ComplexNumber::tan),
    "atan"     => unary(f64::atan),
    "sinh"     => unary(f64::sinh, ComplexNumber::sinh),
    "cosh"     => unary(f64::cosh, ComplexNumber::cosh),
    "tanh"     => unary(f64::tanh, ComplexNumber::tanh),
    "exp"      => unary(f64::exp, ComplexNumber::exp),
    "log"      => unary(f64::ln, ComplexNumber::ln),
    "sqrt"     => unary(f64::sqrt, ComplexNumber::sqrt),
    "abs"      => unary(f64::abs, builtin::complex_abs),
    "sign"     => unary(builtin::sign),
    "step"     => unary(builtin::step),
    "besselj0" => unary(bessel::j0),
    "bessely0" => unary(bessel::y0),
    "besselj1" => unary(bessel::j1),
    "bessely1" => unary(bessel::y1),
    "atan2"    => binary(f64::atan2),
}

/// The standard builtin functions, shared read-only by every unit.
///
/// The table is a compile-time constant; nothing is initialized at runtime.
pub static STANDARD_FUNCTIONS: FunctionRegistry =
    FunctionRegistry { functions: Cow::Borrowed(BUILTIN_TABLE) };

/// Maps function names to [`Builtin`] entries.
///
/// The standard registry borrows the static table. Adding a function makes
/// the registry own a copy.
///
/// # Example
/// ```
/// use evalfunc::interpreter::function::core::{FunctionRegistry, UnaryFunction};
///
/// let registry = FunctionRegistry::standard().with_unary(UnaryFunction::new("cube", |x| x * x * x));
///
/// assert_eq!(registry.get("sin").map(|f| f.arity()), Some(1));
/// assert_eq!(registry.get("atan2").map(|f| f.arity()), Some(2));
/// assert!(registry.get("cube").is_some());
/// assert!(registry.get("nope").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct FunctionRegistry {
    functions: Cow<'static, [Builtin]>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FunctionRegistry {
    /// Returns the standard registry. Does not allocate.
    #[must_use]
    pub fn standard() -> Self {
        STANDARD_FUNCTIONS.clone()
    }

    /// Returns a registry without any functions.
    #[must_use]
    pub const fn empty() -> Self {
        Self { functions: Cow::Borrowed(&[]) }
    }

    /// Looks a function up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Adds a function, replacing any function of the same name.
    #[must_use]
    pub fn with(mut self, builtin: Builtin) -> Self {
        let functions = self.functions.to_mut();
        if let Some(existing) = functions.iter_mut().find(|f| f.name() == builtin.name()) {
            *existing = builtin;
        } else {
            functions.push(builtin);
        }
        self
    }

    /// Adds a unary function, replacing any function of the same name.
    #[must_use]
    pub fn with_unary(self, function: UnaryFunction) -> Self {
        self.with(Builtin::Unary(function))
    }

    /// Iterates over all functions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.functions.iter()
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if no function is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
