//! Wire model and client for the calculation service

pub use client::{CalculatorClient, ClientError};
pub use expression::{parse, ParseError};
pub use model::{
    CalculationRequest, CalculationResponse, CalculationResult, ErrorCode, ErrorDetail,
    Expression, Operation, OperationTag, OperationType, Outcome,
};

mod client;
mod expression;
mod model;
