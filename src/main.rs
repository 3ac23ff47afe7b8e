use tracing::{error, info};

use webtoolkit::web::WebServer;
use webtoolkit::Config;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = webtoolkit::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        webtoolkit::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    let toolkit = &server.app_state().toolkit;
    for dir in [&config.files.upload_dir, &config.files.download_dir] {
        if let Err(e) = toolkit.ensure_dir(dir).await {
            error!("Failed to prepare directory {}: {}", dir, e);
            std::process::exit(1);
        }
    }

    info!("webtoolkit demo server");
    info!(
        "Uploads go to {}, downloads are served from {}",
        config.files.upload_dir, config.files.download_dir
    );

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
