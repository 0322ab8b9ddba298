use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tutor_match::config::{LogFormat, Settings};
use tutor_match::core::Matcher;
use tutor_match::models::ScoringWeights;
use tutor_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use tutor_match::services::TutorDirectory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }

    info!("Starting tutor matching service...");

    // Initialize tutor directory
    let directory = match TutorDirectory::from_settings(&settings.directory) {
        Ok(directory) => Arc::new(directory),
        Err(e) => {
            error!("Failed to initialize tutor directory: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    info!(
        "Tutor directory initialized ({:?}, cache TTL: {}s)",
        directory.source(),
        settings.directory.cache_ttl_secs
    );

    // Warm the cache; a failing source is reported by /health rather than fatal
    match directory.tutors().await {
        Ok(tutors) => info!("Directory warmed with {} tutors", tutors.len()),
        Err(e) => error!("Initial directory load failed: {}", e),
    }

    // Initialize matcher with configured weights
    let weights = ScoringWeights {
        quality: settings.scoring.weights.quality,
        proximity: settings.scoring.weights.proximity,
    };

    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        directory,
        matcher,
        matching: settings.matching.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
