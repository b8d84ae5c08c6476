use log::info;
use rocket::fairing::AdHoc;
use rocket::figment::{providers::Env, Figment};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

/// The caller's `User-Agent` header, forwarded with `404` when absent
#[derive(Debug)]
pub struct UserAgent(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserAgent {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if let Some(agent) = request.headers().get_one("User-Agent") {
            return Outcome::Success(UserAgent(agent.to_string()));
        }
        Outcome::Forward(Status::NotFound)
    }
}

/// Rocket's own configuration sources with `default_port` taking the place
/// of Rocket's default, followed by `APP_` prefixed environment variables
/// whose first underscore separates the section, e.g. `APP_EVALUATOR_MAX_DEPTH`
/// becomes `evaluator.max_depth`
pub fn figment(default_port: u16) -> Figment {
    rocket::Config::figment()
        .merge(("port", default_port))
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}

/// Logs the address the server is listening on once it has started
pub fn lifecycle(service: &'static str) -> AdHoc {
    AdHoc::on_liftoff("Lifecycle", move |rocket| {
        Box::pin(async move {
            let config = rocket.config();
            info!(
                "{} started, listening on {}:{}",
                service, config.address, config.port
            );
        })
    })
}

/// Logs once graceful shutdown has completed
pub fn shutdown(service: &'static str) -> AdHoc {
    AdHoc::on_shutdown("Shutdown", move |_| {
        Box::pin(async move {
            info!("{} shut down", service);
        })
    })
}
