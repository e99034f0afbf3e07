//! Generate OpenAPI specification files
//!
//! Writes the JSON and YAML documents to the directory given as the first
//! argument (default `evently-web/docs`).

use evently_web::openapi::{get_openapi_json, get_openapi_yaml};
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let docs_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("evently-web/docs"));

    fs::create_dir_all(&docs_dir)?;

    let json_path = docs_dir.join("openapi.json");
    fs::write(&json_path, get_openapi_json()?)?;
    println!("Generated: {}", json_path.display());

    let yaml_path = docs_dir.join("openapi.yaml");
    fs::write(&yaml_path, get_openapi_yaml()?)?;
    println!("Generated: {}", yaml_path.display());

    Ok(())
}
