//! Café Orders - HTTP backend entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌─────────────┐    ┌──────────┐
//! │  Config  │───▶│   Gateway    │───▶│ OrderService│───▶│  SQLite  │
//! │  (YAML)  │    │   (axum)     │    │ (lifecycle) │    │ (orders) │
//! └──────────┘    └──────────────┘    └──────┬──────┘    └──────────┘
//!                                            │ spawned, best effort
//!                                   ┌────────┴────────┐
//!                                   ▼                 ▼
//!                              Partner mail      HTML receipt
//! ```
//!
//! Usage: `cafe_orders [--env <name>] [--port <port>]`

use std::sync::Arc;

use anyhow::Context;

use cafe_orders::config::AppConfig;
use cafe_orders::db::Database;
use cafe_orders::gateway::{self, state::AppState};
use cafe_orders::notify::{HtmlReceiptPrinter, LogNotifier, MailNotifier};
use cafe_orders::orders::{OrderService, OrderStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn build_order_service(config: &AppConfig, db: &Database) -> anyhow::Result<OrderService> {
    let mut service = OrderService::new(OrderStore::new(db.pool().clone()))
        .with_enforce_total(config.orders.enforce_total);

    if config.mail.enabled {
        if config.mail.password.is_empty() {
            tracing::warn!("Mail enabled without a password; set {}", cafe_orders::config::SMTP_PASSWORD_ENV);
        }
        let notifier = MailNotifier::new(&config.mail).context("Invalid mail configuration")?;
        tracing::info!(
            "Partner mail via {}:{} to {} recipient(s)",
            config.mail.smtp_host,
            config.mail.smtp_port,
            config.mail.recipients.len()
        );
        service = service.with_notifier(Arc::new(notifier));
    } else {
        tracing::info!("Partner mail disabled, summaries go to the log");
        service = service.with_notifier(Arc::new(LogNotifier::new(config.mail.cafe_name.clone())));
    }

    if config.receipt.enabled {
        tracing::info!("Receipts written to {}", config.receipt.output_dir);
        service = service.with_printer(Arc::new(HtmlReceiptPrinter::new(&config.receipt)));
    } else {
        tracing::info!("Receipts disabled");
    }

    Ok(service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = cafe_orders::logging::init_logging(&app_config.logging);

    tracing::info!(
        "Starting Café Orders in {} mode (build {})",
        env,
        env!("GIT_HASH")
    );

    let db = Database::connect(&app_config.database.url, app_config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", app_config.database.url))?;
    let db = Arc::new(db);

    let orders = Arc::new(build_order_service(&app_config, &db)?);
    let state = Arc::new(AppState::new(orders, db));

    gateway::run_server(&app_config.gateway, state).await
}
