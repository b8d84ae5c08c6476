use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

static ZERO: Expression = Expression::Number(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum OperationType {
    #[strum(serialize = "ADDITION")]
    Add,
    #[strum(serialize = "SUBTRACTION")]
    Subtract,
    #[strum(serialize = "MULTIPLICATION")]
    Multiply,
    #[strum(serialize = "DIVISION")]
    Divide,
    #[strum(serialize = "MODULO")]
    Modulo,
    #[strum(serialize = "POWER")]
    Power,
}

/// The operator as received on the wire
///
/// Unknown names decode successfully so that they can be rejected by the
/// evaluator with a classified error instead of failing the whole request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationTag {
    Known(OperationType),
    Unrecognized(String),
}

impl From<String> for OperationTag {
    fn from(s: String) -> Self {
        match OperationType::from_str(&s) {
            Ok(t) => OperationTag::Known(t),
            Err(_) => OperationTag::Unrecognized(s),
        }
    }
}

impl From<OperationTag> for String {
    fn from(tag: OperationTag) -> Self {
        match tag {
            OperationTag::Known(t) => t.to_string(),
            OperationTag::Unrecognized(s) => s,
        }
    }
}

impl From<OperationType> for OperationTag {
    fn from(t: OperationType) -> Self {
        OperationTag::Known(t)
    }
}

/// A node of the expression tree: either a literal or a nested operation
///
/// Exactly one of `number` and `operation` survives decoding, so an echoed
/// request is the normalised form of what was sent: when both are set the
/// operation is kept and the number dropped, and `{}` comes back as
/// `{"number":0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExpressionFields", into = "ExpressionFields")]
pub enum Expression {
    Number(i64),
    Operation(Box<Operation>),
}

// Wire shape of an expression. When both fields are set the operation wins and
// when neither is set the expression is the literal zero
#[derive(Serialize, Deserialize, Default)]
struct ExpressionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation: Option<Box<Operation>>,
}

impl From<ExpressionFields> for Expression {
    fn from(fields: ExpressionFields) -> Self {
        match (fields.operation, fields.number) {
            (Some(operation), _) => Expression::Operation(operation),
            (None, Some(number)) => Expression::Number(number),
            (None, None) => Expression::default(),
        }
    }
}

impl From<Expression> for ExpressionFields {
    fn from(expression: Expression) -> Self {
        match expression {
            Expression::Number(number) => ExpressionFields {
                number: Some(number),
                operation: None,
            },
            Expression::Operation(operation) => ExpressionFields {
                number: None,
                operation: Some(operation),
            },
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        Expression::Number(0)
    }
}

impl From<i64> for Expression {
    fn from(n: i64) -> Self {
        Expression::Number(n)
    }
}

impl From<Operation> for Expression {
    fn from(operation: Operation) -> Self {
        Expression::Operation(Box::new(operation))
    }
}

impl Expression {
    pub fn number(n: i64) -> Expression {
        Expression::Number(n)
    }

    pub fn operation(kind: OperationType, op1: Expression, op2: Expression) -> Expression {
        Operation::new(kind, op1, op2).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Operation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OperationTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op1: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op2: Option<Expression>,
}

impl Operation {
    pub fn new(kind: OperationType, op1: Expression, op2: Expression) -> Operation {
        Operation {
            kind: Some(kind.into()),
            op1: Some(op1),
            op2: Some(op2),
        }
    }

    /// The first operand, zero when absent
    pub fn op1(&self) -> &Expression {
        self.op1.as_ref().unwrap_or(&ZERO)
    }

    /// The second operand, zero when absent
    pub fn op2(&self) -> &Expression {
        self.op2.as_ref().unwrap_or(&ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CalculationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
}

impl CalculationRequest {
    pub fn new(operation: Operation) -> CalculationRequest {
        CalculationRequest {
            operation: Some(operation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub expression: Expression,
}

/// Legacy numeric error codes, stable across releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Arithmetic = 1,
    InvalidArgument = 2,
    MalformedRequest = 3,
}

impl ErrorCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u32,
    pub message: String,
}

impl ErrorDetail {
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> ErrorDetail {
        ErrorDetail {
            code: code.code(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Result(CalculationResult),
    Errors(Vec<ErrorDetail>),
}

/// The originating request together with either its result or its errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub request: CalculationRequest,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl CalculationResponse {
    pub fn success(request: CalculationRequest, value: i64) -> CalculationResponse {
        CalculationResponse {
            request,
            outcome: Outcome::Result(CalculationResult {
                expression: Expression::Number(value),
            }),
        }
    }

    pub fn failure(request: CalculationRequest, error: ErrorDetail) -> CalculationResponse {
        CalculationResponse {
            request,
            outcome: Outcome::Errors(vec![error]),
        }
    }

    /// The computed value, if the calculation succeeded
    pub fn value(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Result(CalculationResult {
                expression: Expression::Number(n),
            }) => Some(*n),
            _ => None,
        }
    }

    pub fn errors(&self) -> &[ErrorDetail] {
        match &self.outcome {
            Outcome::Errors(errors) => errors.as_slice(),
            Outcome::Result(_) => &[],
        }
    }
}
