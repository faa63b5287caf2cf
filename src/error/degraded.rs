use std::fmt::Display;

/// A non-fatal evaluation condition.
///
/// Raised when a complex value meets an operation that is only defined on
/// real numbers. The evaluator keeps going with a substituted real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// A comparison operand had a non-zero imaginary part and was replaced by
    /// zero.
    ComplexComparison,
    /// An `and`, `or` or `not` operand had a non-zero imaginary part; only its
    /// real part was tested.
    ComplexCondition,
    /// A real-only function received a non-real argument; it was applied to
    /// the real part.
    ComplexFunctionArgument {
        /// Name of the function.
        function: &'static str,
    },
    /// The imaginary unit was evaluated in the real domain and replaced by
    /// zero.
    ImaginaryInRealDomain,
}

impl Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ComplexComparison => write!(f, "illegal complex value in comparison, using 0"),
            Self::ComplexCondition => {
                write!(f, "complex value used as condition, testing its real part")
            },
            Self::ComplexFunctionArgument { function } => {
                write!(f, "complex argument to real function '{function}', using its real part")
            },
            Self::ImaginaryInRealDomain => {
                write!(f, "imaginary unit evaluated in the real domain, using 0")
            },
        }
    }
}

/// Collects the degradations of one evaluation.
///
/// Only the first degradation is kept together with a total count, so
/// recording never allocates.
///
/// # Example
/// ```
/// use evalfunc::error::{Degradation, DegradedReport};
///
/// let mut report = DegradedReport::default();
/// assert!(report.is_clean());
///
/// report.record(Degradation::ComplexComparison);
/// report.record(Degradation::ComplexCondition);
/// assert_eq!(report.count(), 2);
/// assert_eq!(report.first(), Some(Degradation::ComplexComparison));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegradedReport {
    first: Option<Degradation>,
    count: usize,
}

impl DegradedReport {
    /// Records one degradation.
    pub const fn record(&mut self, degradation: Degradation) {
        if self.first.is_none() {
            self.first = Some(degradation);
        }
        self.count += 1;
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.count == 0
    }

    /// Number of degradations recorded.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The first degradation recorded, if any.
    #[must_use]
    pub const fn first(&self) -> Option<Degradation> {
        self.first
    }

    /// Emits one warning summarizing the report. Does nothing when clean.
    pub(crate) fn log(&self) {
        if let Some(first) = self.first {
            tracing::warn!(count = self.count, "degraded evaluation: {first}");
        }
    }
}
