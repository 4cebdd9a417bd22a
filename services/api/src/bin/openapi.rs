//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the notes quiz API. The target path is the first
//! argument (default `openapi.json`); `-` prints to stdout instead.

use api_lib::web::rest::openapi_document;
use std::io::Write;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let document = openapi_document().to_pretty_json()?;

    if target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(&target, document)?;
        eprintln!("Wrote OpenAPI document to {}", target);
    }
    Ok(())
}
