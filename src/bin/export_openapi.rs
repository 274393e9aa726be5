//! Write the OpenAPI document of the order API
//!
//! Usage:
//!   export_openapi > openapi.json
//!   export_openapi --output docs/openapi.json

use anyhow::Context;
use utoipa::OpenApi;

use cafe_orders::gateway::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let output_path = match args.get(1).map(String::as_str) {
        Some("--output") => Some(args.get(2).context("--output needs a path")?.as_str()),
        _ => None,
    };

    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI document")?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Failed to write {}", path))?;
            eprintln!("OpenAPI document written to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
