use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use ferrobank_api::api::handlers::auth::{login, register};
use ferrobank_api::api::handlers::ledger::{account, deposit, health, protected, transfer};
use ferrobank_api::app::ledger_service::LedgerService;
use ferrobank_api::domain::auth::AuthManager;
use ferrobank_api::infrastructure::config::Config;
use ferrobank_api::infrastructure::logger::Logger;
use ferrobank_api::infrastructure::storage::file_storage::AccountStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration before logging so the log level is honored
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(std::io::Error::other(format!(
                "Configuration loading failed: {e}"
            )));
        }
    };

    Logger::init(&config.log_level);

    log::info!("🚀 Starting FerroBank API...");

    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        log::error!(
            "❌ Configuration validation failed: {}",
            validation_errors.join(", ")
        );
        return Err(std::io::Error::other(format!(
            "Configuration validation failed: {}",
            validation_errors.join(", ")
        )));
    }
    log::info!("✅ Configuration loaded (environment: {})", config.environment);

    if config.jwt_secret_generated {
        log::warn!("⚠️ JWT_SECRET not set, using an ephemeral secret; tokens will not survive a restart");
    }

    // Open the account store
    let store = match AccountStore::new(&config.data_dir) {
        Ok(store) => {
            log::info!("✅ Account store opened ({} accounts)", store.count());
            Arc::new(store)
        }
        Err(e) => {
            log::error!("❌ Failed to open account store: {e}");
            return Err(std::io::Error::other(format!(
                "Account store initialization failed: {e}"
            )));
        }
    };

    let auth_manager = Arc::new(AuthManager::new(
        config.jwt_secret.clone(),
        config.token_ttl_hours,
    ));
    log::info!("✅ Auth manager initialized");

    let ledger_service = Arc::new(LedgerService::new(
        Arc::clone(&store),
        Arc::clone(&auth_manager),
    ));
    log::info!("✅ Ledger service initialized");

    let port = config.port;
    log::info!("🌐 Starting FerroBank API on port {port}");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .app_data(web::Data::new(Arc::clone(&store)))
            .app_data(web::Data::new(Arc::clone(&auth_manager)))
            .app_data(web::Data::new(Arc::clone(&ledger_service)))
            .service(health)
            .service(
                web::scope("/api/auth")
                    .service(register)
                    .service(login)
                    .service(deposit)
                    .service(transfer)
                    .service(account),
            )
            .service(web::scope("/api").service(protected))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
