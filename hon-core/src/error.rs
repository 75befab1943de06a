//! Error types for parameter validation and command operations

use thiserror::Error;

/// A value was rejected by a parameter; the parameter keeps its old value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Parameter {0} value {1} is lower than minimum value {2}")]
    TooLow(String, f64, f64),
    #[error("Parameter {0} value {1} is higher than maximum value {2}")]
    TooHigh(String, f64, f64),
    #[error("Parameter {0} value {1} is not a multiple of step {2} from {3}")]
    OffStep(String, f64, f64, f64),
    #[error("Parameter {0} value '{1}' is not numeric")]
    NotNumeric(String, String),
    #[error("Parameter {0} value '{1}' is not one of {2:?}")]
    NotAllowed(String, String, Vec<String>),
    #[error("Cannot sync {1} parameter {0} from a {2} parameter")]
    IncompatibleSync(String, &'static str, &'static str),
}

/// Errors from operations on a command or a group of categories
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Command {0} has no parameter {1}")]
    UnknownParameter(String, String),
    #[error("Command {0} has no category {1}")]
    UnknownCategory(String, String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Rule {0} -> {1} re-entered while it was being applied")]
    RuleCycle(String, String),
    #[error("Parameter {0} selects a category, set it on the command group")]
    CategorySelection(String),
}
