use calculator::config::DEFAULT_PORT;

#[rocket::main]
async fn main() {
    env_logger::init();

    let figment = rocket_util::figment(DEFAULT_PORT);
    let rocket = calculator::build(figment).expect("Failed to load configuration");

    rocket.launch().await.expect("Rocket exited with error");
}
