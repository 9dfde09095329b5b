use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use vacation_planner_api::{
    config::AppConfig,
    db::mongo::{create_mongo_client, MongoStore},
    middleware::auth::AuthConfig,
    routes,
};

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin).supports_credentials(),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let client = create_mongo_client(&config.mongodb_uri)
        .await
        .map_err(std::io::Error::other)?;
    let store = MongoStore::new(&client, &config.database_name);
    if let Err(e) = store.ensure_indexes().await {
        log::error!("Failed to ensure indexes: {}", e);
    }

    let store = web::Data::new(store);
    let auth = web::Data::new(AuthConfig::new(
        config.jwt_secret.clone(),
        config.token_ttl_hours,
    ));
    let allowed_origin = config.cors_allowed_origin.clone();

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(auth.clone())
            .configure(routes::configure::<MongoStore>)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
