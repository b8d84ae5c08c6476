//! Reduces expression trees to 64-bit integers
//!
//! Arithmetic uses two's complement wrapping: overflow in addition,
//! subtraction, multiplication and exponentiation is not an error.
//! Evaluation recurses once per level of nesting, bounded by `max_depth`.

use calculator_client::{Expression, Operation, OperationTag, OperationType};

pub use config::EvaluatorConfig;
pub use error::EvalError;

mod config;
mod error;

const DIVIDE_BY_ZERO: &str = "attempt to divide by zero";
const REMAINDER_BY_ZERO: &str = "attempt to calculate the remainder with a divisor of zero";

/// Largest accepted exponent for [`OperationType::Power`]
pub const MAX_EXPONENT: i64 = i32::MAX as i64;

#[derive(Debug, Clone)]
pub struct Evaluator {
    max_depth: usize,
}

impl Evaluator {
    pub fn new(config: &EvaluatorConfig) -> Evaluator {
        Evaluator {
            max_depth: config.max_depth,
        }
    }

    pub fn evaluate(&self, expression: &Expression) -> Result<i64, EvalError> {
        self.eval(expression, 0)
    }

    pub fn calculate(&self, operation: &Operation) -> Result<i64, EvalError> {
        self.apply(operation, 1)
    }

    fn eval(&self, expression: &Expression, depth: usize) -> Result<i64, EvalError> {
        match expression {
            Expression::Number(n) => Ok(*n),
            Expression::Operation(operation) => self.apply(operation, depth + 1),
        }
    }

    fn apply(&self, operation: &Operation, depth: usize) -> Result<i64, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::InvalidArgument(format!(
                "expression exceeds maximum depth of {}",
                self.max_depth
            )));
        }

        // The operator is validated before any operand is evaluated
        let kind = match &operation.kind {
            Some(OperationTag::Known(kind)) => *kind,
            Some(OperationTag::Unrecognized(tag)) => {
                return Err(EvalError::InvalidArgument(format!(
                    "unsupported operation: {}",
                    tag
                )))
            }
            None => {
                return Err(EvalError::InvalidArgument(
                    "no type specified on operation".to_string(),
                ))
            }
        };

        let op1 = self.eval(operation.op1(), depth)?;
        let op2 = self.eval(operation.op2(), depth)?;

        match kind {
            OperationType::Add => Ok(op1.wrapping_add(op2)),
            OperationType::Subtract => Ok(op1.wrapping_sub(op2)),
            OperationType::Multiply => Ok(op1.wrapping_mul(op2)),
            OperationType::Divide => divide(op1, op2),
            OperationType::Modulo => modulo(op1, op2),
            OperationType::Power => power(op1, op2),
        }
    }
}

fn divide(op1: i64, op2: i64) -> Result<i64, EvalError> {
    if op2 == 0 {
        return Err(EvalError::Arithmetic(DIVIDE_BY_ZERO.to_string()));
    }
    Ok(op1.wrapping_div(op2))
}

fn modulo(op1: i64, op2: i64) -> Result<i64, EvalError> {
    if op2 == 0 {
        return Err(EvalError::Arithmetic(REMAINDER_BY_ZERO.to_string()));
    }
    Ok(op1.wrapping_rem(op2))
}

// Multiplication modulo 2^64 commutes with truncation, so the wrapped power
// equals the exact power truncated to its low 64 bits
fn power(op1: i64, op2: i64) -> Result<i64, EvalError> {
    if !(0..=MAX_EXPONENT).contains(&op2) {
        return Err(EvalError::InvalidArgument(format!(
            "op2 must be between 0 and {}",
            MAX_EXPONENT
        )));
    }
    Ok(op1.wrapping_pow(op2 as u32))
}
