use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use userline::handlers;
use userline::store::FileStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let db_path = std::env::var("USERS_DB").unwrap_or_else(|_| "users.jsonl".to_string());
    let addr = format!("127.0.0.1:{}", port);

    let store = FileStore::open(db_path.as_str())
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let store = web::Data::new(store);
    tracing::info!(db = %db_path, "store opened");
    tracing::info!("Server started on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .configure(handlers::configure)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(addr)?
    .run()
    .await
}
