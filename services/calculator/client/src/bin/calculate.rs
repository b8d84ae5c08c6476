use std::process;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use reqwest::ClientBuilder;

use calculator_client::{CalculationRequest, CalculatorClient, Expression};

/// Sends an infix expression to the calculation service and prints the outcome
#[derive(Parser)]
#[command(name = "calculate")]
struct Args {
    /// Base URL of the calculation service
    #[arg(long, env = "CALCULATOR_UPSTREAM", default_value = "http://localhost:8081")]
    upstream: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Expression to evaluate, e.g. "6 + 3 ^ (5 % (6 / 2))"
    #[arg(default_value = "6 + 3 ^ (5 % (6 / 2))")]
    expression: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let operation = match calculator_client::parse(&args.expression) {
        Ok(Expression::Operation(operation)) => *operation,
        Ok(Expression::Number(_)) => {
            error!("\"{}\" contains no operator", args.expression);
            process::exit(2);
        }
        Err(e) => {
            error!("cannot parse \"{}\": {}", args.expression, e);
            process::exit(2);
        }
    };

    let http_client = ClientBuilder::new()
        .timeout(Duration::from_secs(args.timeout))
        .build()
        .expect("Failed to build HTTP Client");

    let client = CalculatorClient::new(http_client, args.upstream);

    match client
        .make_calculation(&CalculationRequest::new(operation))
        .await
    {
        Ok(response) => {
            info!("{:?}", response);
            match response.value() {
                Some(value) => println!("{}", value),
                None => {
                    for e in response.errors() {
                        println!("error {}: {}", e.code, e.message);
                    }
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            warn!("RPC failed: {}", e);
            process::exit(1);
        }
    }
}
