/// Lex or parse failure, with the byte offset into the (trimmed) source.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expr error at byte {offset}: {message}")]
pub struct ExprError {
    /// Byte offset of the failure.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl ExprError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Failure while evaluating a parsed expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A builtin was called with an unsupported number of arguments.
    #[error("{func} expects {expected}, got {got} argument(s)")]
    Arity {
        /// Builtin name.
        func: &'static str,
        /// Human-readable accepted arity.
        expected: &'static str,
        /// Argument count at the call site.
        got: usize,
    },

    /// Expression nesting exceeded the evaluator's recursion limit.
    #[error("expression nesting exceeds {0} levels")]
    TooDeep(usize),
}
