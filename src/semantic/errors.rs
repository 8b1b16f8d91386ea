//! Semantic error types
//!
//! Semantic errors are not fatal on their own: the evaluator records each one
//! and keeps walking, so a single run reports every independent problem. A
//! run with a non-empty error list is a failed run.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A variable or parameter name declared twice in the same table
    #[error("line {line}: redefinition of '{name}'")]
    Redefinition { name: String, line: usize },

    /// A function name defined twice
    #[error("line {line}: redefinition of function '{name}'")]
    FunctionRedefinition { name: String, line: usize },

    /// A variable declared with type `void`
    #[error("line {line}: variable '{name}' declared void")]
    VoidVariable { name: String, line: usize },

    /// An array length that is not a representable non-negative integer
    #[error("line {line}: invalid length '{length}' for array '{name}'")]
    InvalidArrayLength {
        name: String,
        length: String,
        line: usize,
    },

    /// A variable whose storage does not fit after the table's existing
    /// entries
    #[error("line {line}: '{name}' is too large")]
    StorageOverflow { name: String, line: usize },

    #[error("line {line}: use of undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize },

    #[error("line {line}: call to undefined function '{name}'")]
    UndefinedFunction { name: String, line: usize },

    /// Number of call arguments differs from the number of parameters
    #[error("line {line}: function '{function}' takes {expected} argument(s) but {got} were given")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        line: usize,
    },

    /// A literal subscript outside the declared array length
    #[error("line {line}: index {index} is out of bounds for '{name}' of length {length}")]
    IndexOutOfBounds {
        name: String,
        index: i64,
        length: usize,
        line: usize,
    },

    #[error("line {line}: '{name}' is not an array")]
    NotAnArray { name: String, line: usize },
}

impl SemanticError {
    pub fn line(&self) -> usize {
        match self {
            SemanticError::Redefinition { line, .. }
            | SemanticError::FunctionRedefinition { line, .. }
            | SemanticError::VoidVariable { line, .. }
            | SemanticError::InvalidArrayLength { line, .. }
            | SemanticError::StorageOverflow { line, .. }
            | SemanticError::UndefinedVariable { line, .. }
            | SemanticError::UndefinedFunction { line, .. }
            | SemanticError::ArgumentCountMismatch { line, .. }
            | SemanticError::IndexOutOfBounds { line, .. }
            | SemanticError::NotAnArray { line, .. } => *line,
        }
    }
}
