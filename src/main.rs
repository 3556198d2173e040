mod apis;
mod auth;
mod config;
mod constants;
mod db;
mod error;
mod handler;
mod jwt;
mod model;
mod repo;
mod service;
mod storage;
mod utils;

#[cfg(test)]
mod tests;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;

use config::Settings;
use jwt::Jwt;
use storage::BlobStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::from_env().context("loading configuration")?;

    let pool = db::connect(&settings.database_url)
        .await
        .with_context(|| format!("connecting to {}", settings.database_url))?;
    db::initialize_db(&pool).await.context("initializing the db")?;

    let blobs = BlobStore::new(settings.upload_dir.clone());
    blobs.init().await.context("preparing the upload dir")?;

    let bind_addr = settings.bind_addr.clone();
    let upload_dir = blobs.root().to_path_buf();
    let jwt = web::Data::new(Jwt::new(&settings.jwt_secret));
    let blobs = web::Data::new(blobs);
    let settings = web::Data::new(settings);
    let pool = web::Data::new(pool);

    log::info!("## Listening on {}, storing uploads in {}", bind_addr, upload_dir.display());

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(jwt.clone())
            .app_data(blobs.clone())
            .app_data(settings.clone())
            .app_data(apis::json_config())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(actix_web::middleware::Logger::default())
            .configure(apis::routes)
            .service(apis::uploads(&upload_dir))
    })
    .bind(&bind_addr)
    .with_context(|| format!("binding {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
