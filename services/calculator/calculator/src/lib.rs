//! Evaluates integer expression trees submitted over HTTP

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate rocket;

use rocket::figment::Figment;
use rocket::{Build, Rocket};

use crate::config::Config;
use crate::evaluator::Evaluator;

pub mod api;
pub mod config;
pub mod evaluator;
pub mod service;

/// Assembles the service from `figment`, ready to launch
pub fn build(figment: Figment) -> Result<Rocket<Build>, rocket::figment::Error> {
    let config: Config = figment.extract()?;
    let evaluator = Evaluator::new(&config.evaluator);

    Ok(rocket::custom(figment)
        .manage(evaluator)
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(rocket_util::lifecycle("calculator"))
        .attach(rocket_util::shutdown("calculator")))
}
