use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use indexmap::IndexMap;

use crate::error::{CompileError, CompileResult};

/// Words the tokenizer reserves for boolean operators.
pub const KEYWORDS: &[&str] = &["and", "or", "not"];

/// A shared, mutable `f64` cell.
///
/// The host keeps one handle and writes to it; every program that pushes the
/// cell holds another handle and reads the current value at each evaluation.
/// Cloning a cell yields a handle to the same storage.
///
/// Reads and writes are atomic but unordered with respect to other memory
/// operations; a host that writes while other threads evaluate must provide
/// its own ordering.
///
/// # Example
/// ```
/// use evalfunc::interpreter::symbols::ExternalCell;
///
/// let cell = ExternalCell::new(1.0);
/// let alias = cell.clone();
///
/// cell.set(5.0);
/// assert_eq!(alias.get(), 5.0);
/// assert!(cell.same_cell(&alias));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExternalCell(Arc<AtomicU64>);

impl ExternalCell {
    /// Creates a cell holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(Arc::new(AtomicU64::new(value.to_bits())))
    }

    /// Reads the current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Overwrites the current value.
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Returns `true` if both handles refer to the same storage.
    #[must_use]
    pub fn same_cell(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ExternalCell {
    fn eq(&self, other: &Self) -> bool {
        self.same_cell(other)
    }
}

/// Shape of a declared argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    /// 1-based index of the first input slot.
    pub slot:       usize,
    /// Number of consecutive slots the argument occupies.
    pub width:      usize,
    /// Whether the argument is complex valued.
    pub is_complex: bool,
}

impl Argument {
    /// Index of the last slot the argument occupies.
    #[must_use]
    pub const fn last_slot(&self) -> usize {
        self.slot + self.width - 1
    }
}

/// An insertion-ordered name → entry map.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<T> SymbolTable<T> {
    /// Inserts or replaces an entry.
    pub fn set(&mut self, name: &str, value: T) {
        self.entries.insert(name.to_string(), value);
    }

    /// Looks an entry up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Returns `true` if `name` has an entry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Position of `name` in insertion order.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What an identifier resolved to.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A declared argument.
    Argument(Argument),
    /// A registered external cell.
    External(ExternalCell),
    /// A registered constant.
    Constant(f64),
}

/// The three tables a formula's identifiers are resolved against.
#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    /// Named constants, folded into the program.
    pub constants: SymbolTable<f64>,
    /// Named external cells, read at evaluation time.
    pub externals: SymbolTable<ExternalCell>,
    /// Named argument slots.
    pub arguments: SymbolTable<Argument>,
}

impl SymbolTables {
    /// Creates tables holding only the predefined constant `pi`.
    #[must_use]
    pub fn new() -> Self {
        let mut tables = Self::default();
        tables.constants.set("pi", std::f64::consts::PI);
        tables
    }

    /// Resolves a name. Arguments take precedence over external cells, which
    /// take precedence over constants.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        if let Some(argument) = self.arguments.get(name) {
            return Some(Symbol::Argument(*argument));
        }
        if let Some(cell) = self.externals.get(name) {
            return Some(Symbol::External(cell.clone()));
        }
        self.constants.get(name).map(|value| Symbol::Constant(*value))
    }

    /// Number of input slots the declared arguments need.
    #[must_use]
    pub fn required_inputs(&self) -> usize {
        self.arguments
            .iter()
            .map(|(_, argument)| argument.last_slot())
            .max()
            .unwrap_or(0)
    }
}

/// Checks that `name` can be defined as a symbol.
///
/// The name must be an identifier and must not be a keyword.
///
/// # Example
/// ```
/// use evalfunc::interpreter::symbols::validate_name;
///
/// assert!(validate_name("x_1").is_ok());
/// assert!(validate_name("and").is_err());
/// assert!(validate_name("2x").is_err());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> CompileResult<()> {
    let mut chars = name.chars();
    let valid = chars.next()
                     .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(CompileError::InvalidDefinition { name:   name.to_string(),
                                                     reason: "not an identifier", });
    }
    if KEYWORDS.contains(&name) {
        return Err(CompileError::InvalidDefinition { name:   name.to_string(),
                                                     reason: "reserved keyword", });
    }
    Ok(())
}
