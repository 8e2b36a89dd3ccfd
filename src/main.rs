use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use todolist::{auth::SessionGuard, auth::TokenCodec, config::Config, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&config).await.map_err(|e| {
        log::error!("failed to connect to database: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
    })?;

    db::migrate(&pool).await.map_err(|e| {
        log::error!("failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let codec = TokenCodec::new(&config.jwt_secret);
    let bind = (config.server_host.clone(), config.server_port);
    log::info!("Starting todolist server at {}", config.server_url());

    let pool = web::Data::new(pool);
    let codec_data = web::Data::new(codec.clone());
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(codec_data.clone())
            .app_data(config.clone())
            .wrap(SessionGuard::new(codec.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind)?
    .run()
    .await
}
