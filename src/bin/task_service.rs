use dotenv::dotenv;
use env_logger::Env;
use taskboard::server::{self, Resource};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    server::run(Resource::Tasks).await
}
