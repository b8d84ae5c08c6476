use log::{info, warn};

use calculator_client::{CalculationRequest, CalculationResponse, ErrorCode, ErrorDetail};
use telemetry::Measure;

use crate::evaluator::{EvalError, Evaluator};

lazy_static! {
    static ref CALCULATION_MEASURE: Measure = Measure::new("service", "make_calculation");
}

/// Evaluates the request's root operation and wraps the outcome, echoing the
/// request, into a response
pub fn make_calculation(evaluator: &Evaluator, request: CalculationRequest) -> CalculationResponse {
    let outcome = request
        .operation
        .as_ref()
        .map(|operation| CALCULATION_MEASURE.record(|| evaluator.calculate(operation)));

    match outcome {
        None => {
            warn!("no operation specified");
            CalculationResponse::failure(
                request,
                ErrorDetail::new(ErrorCode::MalformedRequest, "no operation specified"),
            )
        }
        Some(Ok(value)) => {
            info!("calculated a result: {}", value);
            CalculationResponse::success(request, value)
        }
        Some(Err(e)) => {
            match &e {
                EvalError::Arithmetic(_) => info!("arithmetic failure: {}", e),
                EvalError::InvalidArgument(_) => warn!("invalid argument: {}", e),
            }
            CalculationResponse::failure(request, e.into())
        }
    }
}
