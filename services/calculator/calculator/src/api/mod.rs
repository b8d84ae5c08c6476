use std::borrow::Cow;

use log::info;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{self, Json, Value};
use rocket::{Catcher, Request, Route, State};

use calculator_client::{CalculationRequest, CalculationResponse};
use rocket_util::UserAgent;
use telemetry::Measure;

use crate::evaluator::Evaluator;
use crate::service;

pub use error::ApiError;
use error::ErrorResponse;

mod error;

lazy_static! {
    static ref CALCULATION_MEASURE: Measure = Measure::new("controller", "make_calculation");
}

#[get("/status")]
fn status() -> Value {
    json::json!({ "status": "ok" })
}

#[get("/metrics")]
fn metrics() -> Result<String, ApiError> {
    telemetry::encode().map_err(ApiError::from)
}

// Classified evaluation errors are part of a successful response; only a body
// that cannot be decoded is rejected
#[post("/api/v1/calculation", format = "json", data = "<request>")]
async fn make_calculation(
    request: Result<Json<CalculationRequest>, json::Error<'_>>,
    agent: Option<UserAgent>,
    evaluator: &State<Evaluator>,
) -> Result<Json<CalculationResponse>, ApiError> {
    CALCULATION_MEASURE
        .stats(async move {
            let request = request?.into_inner();
            match agent {
                Some(UserAgent(agent)) => info!("received a request from {}", agent),
                None => info!("received a request"),
            }

            Ok(Json(service::make_calculation(evaluator, request)))
        })
        .await
}

#[catch(default)]
fn default_catcher(status: Status, _: &Request<'_>) -> Custom<Json<ErrorResponse<'static>>> {
    let message = status.reason().unwrap_or("Unknown Error");
    Custom(
        status,
        Json(ErrorResponse {
            message: Cow::Borrowed(message),
        }),
    )
}

pub fn routes() -> Vec<Route> {
    routes![status, metrics, make_calculation]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use rocket::http::{ContentType, Header};
    use rocket::local::blocking::Client;
    use serde::Deserialize;
    use serde_json::json;

    use crate::evaluator::EvaluatorConfig;

    use super::*;

    #[derive(Deserialize)]
    struct StatusResponse {
        status: String,
    }

    #[derive(Deserialize)]
    struct Message {
        message: String,
    }

    fn client() -> Client {
        let rocket = rocket::build()
            .manage(Evaluator::new(&EvaluatorConfig::default()))
            .mount("/", routes())
            .register("/", catchers());
        Client::untracked(rocket).expect("valid rocket instance")
    }

    fn calculate(client: &Client, body: serde_json::Value) -> CalculationResponse {
        let response = client
            .post("/api/v1/calculation")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        response.into_json().expect("valid calculation response")
    }

    // 3 * 2 + 3 ^ (5 % (6 / 2)) in wire form, the modulo node and the
    // multiply node are supplied by the caller
    fn demo_request(modulo: serde_json::Value, multiply: serde_json::Value) -> serde_json::Value {
        json!({
            "operation": {
                "type": "ADDITION",
                "op1": { "operation": multiply },
                "op2": {
                    "operation": {
                        "type": "POWER",
                        "op1": { "number": 3 },
                        "op2": { "operation": modulo }
                    }
                }
            }
        })
    }

    fn division(divisor: i64) -> serde_json::Value {
        json!({
            "type": "DIVISION",
            "op1": { "number": 6 },
            "op2": { "number": divisor }
        })
    }

    #[test]
    fn test_status() -> Result<(), Box<dyn Error>> {
        let client = client();
        let response = client.get("/status").dispatch();

        assert_eq!(response.status(), Status::Ok);
        let decoded: StatusResponse = serde_json::from_str(&response.into_string().unwrap())?;
        assert_eq!(decoded.status, "ok");
        Ok(())
    }

    #[test]
    fn test_happy_path() {
        let client = client();
        let body = demo_request(
            json!({ "type": "MODULO", "op1": { "number": 5 }, "op2": { "operation": division(2) } }),
            json!({ "type": "MULTIPLICATION", "op1": { "number": 3 }, "op2": { "number": 2 } }),
        );

        let response = calculate(&client, body.clone());

        assert_eq!(response.value(), Some(15));
        assert!(response.errors().is_empty());
        assert_eq!(serde_json::to_value(&response.request).unwrap(), body);
    }

    #[test]
    fn test_missing_type() {
        let client = client();
        let body = demo_request(
            json!({ "op1": { "number": 5 }, "op2": { "operation": division(2) } }),
            json!({ "type": "MULTIPLICATION", "op1": { "number": 3 }, "op2": { "number": 2 } }),
        );

        let response = calculate(&client, body);

        assert_eq!(response.value(), None);
        assert_eq!(response.errors().len(), 1);
        assert_eq!(response.errors()[0].code, 2);
    }

    #[test]
    fn test_unrecognized_type() {
        let client = client();
        let body = demo_request(
            json!({ "type": "SQUARE_ROOT", "op1": { "number": 5 } }),
            json!({ "type": "MULTIPLICATION", "op1": { "number": 3 }, "op2": { "number": 2 } }),
        );

        let response = calculate(&client, body);

        assert_eq!(response.errors()[0].code, 2);
        assert_eq!(
            response.errors()[0].message,
            "unsupported operation: SQUARE_ROOT"
        );
    }

    #[test]
    fn test_missing_operand() {
        let client = client();
        let body = demo_request(
            json!({ "type": "MODULO", "op1": { "number": 5 }, "op2": { "operation": division(2) } }),
            json!({ "type": "MULTIPLICATION", "op2": { "number": 2 } }),
        );

        let response = calculate(&client, body);

        assert_eq!(response.value(), Some(9));
        assert!(response.errors().is_empty());
    }

    #[test]
    fn test_division_by_zero() {
        let client = client();
        let body = demo_request(
            json!({ "type": "MODULO", "op1": { "number": 5 }, "op2": { "operation": division(0) } }),
            json!({ "type": "MULTIPLICATION", "op1": { "number": 3 }, "op2": { "number": 2 } }),
        );

        let response = calculate(&client, body);

        assert_eq!(response.value(), None);
        assert_eq!(response.errors().len(), 1);
        assert_eq!(response.errors()[0].code, 1);
    }

    #[test]
    fn test_exponent_bounds() {
        let client = client();
        let power = |exponent: i64| {
            json!({
                "operation": {
                    "type": "POWER",
                    "op1": { "number": 1 },
                    "op2": { "number": exponent }
                }
            })
        };

        assert_eq!(calculate(&client, power(2147483647)).value(), Some(1));
        assert_eq!(calculate(&client, power(2147483648)).errors()[0].code, 2);
        assert_eq!(calculate(&client, power(-1)).errors()[0].code, 2);
    }

    #[test]
    fn test_no_operation() {
        let client = client();
        let response = calculate(&client, json!({}));

        assert_eq!(response.value(), None);
        assert_eq!(response.errors().len(), 1);
        assert_eq!(response.errors()[0].code, 3);
        assert_eq!(response.errors()[0].message, "no operation specified");
    }

    #[test]
    fn test_user_agent() {
        let client = client();
        let response = client
            .post("/api/v1/calculation")
            .header(ContentType::JSON)
            .header(Header::new("User-Agent", "calculate/0.1"))
            .body(r#"{"operation":{"type":"SUBTRACTION","op1":{"number":1},"op2":{"number":3}}}"#)
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        let decoded: CalculationResponse = response.into_json().unwrap();
        assert_eq!(decoded.value(), Some(-2));
    }

    #[test]
    fn test_malformed_body() {
        let client = client();
        let response = client
            .post("/api/v1/calculation")
            .header(ContentType::JSON)
            .body("{\"operation\": ")
            .dispatch();

        assert_eq!(response.status(), Status::BadRequest);
        let decoded: Message = response.into_json().unwrap();
        assert!(!decoded.message.is_empty());
    }

    #[test]
    fn test_nesting_beyond_decoder_limit() {
        let client = client();
        let mut expression = r#"{"number":1}"#.to_string();
        for _ in 0..100 {
            expression = format!(
                r#"{{"operation":{{"type":"ADDITION","op1":{},"op2":{{"number":1}}}}}}"#,
                expression
            );
        }
        let body = format!(
            r#"{{"operation":{{"type":"ADDITION","op1":{},"op2":{{"number":1}}}}}}"#,
            expression
        );

        let response = client
            .post("/api/v1/calculation")
            .header(ContentType::JSON)
            .body(body)
            .dispatch();

        assert_eq!(response.status(), Status::BadRequest);
        let decoded: Message = response.into_json().unwrap();
        assert!(decoded.message.contains("recursion limit"));
    }

    #[test]
    fn test_not_found() {
        let client = client();
        let response = client.get("/api/v1/unknown").dispatch();

        assert_eq!(response.status(), Status::NotFound);
        let decoded: Message = response.into_json().unwrap();
        assert_eq!(decoded.message, "Not Found");
    }

    #[test]
    fn test_metrics() {
        let client = client();
        calculate(&client, json!({}));

        let response = client.get("/metrics").dispatch();

        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().unwrap();
        assert!(body.contains("calls_succeeded_total"));
        assert!(body.contains("function=\"make_calculation\""));
    }
}
