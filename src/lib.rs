//! Infer statistically-annotated OpenAPI specs from recorded HTTP traffic.
//!
//! Pipeline: HAR entries → route aggregation (owns Node construction and
//! merging) → JSON Schema export per body → OpenAPI document assembly.
pub mod builder;
pub mod cli;
pub mod error;
pub mod har;
pub mod node;
pub mod openapi;

pub use builder::ApiSpecBuilder;
pub use error::Error;
pub use har::HarReader;
pub use openapi::OpenApiSpecGenerator;

use std::path::Path;

/// Generate an OpenAPI document from every HAR file under `har_directory`.
///
/// With `base_url`, only entries whose URL starts with it are processed and
/// they group under that URL; otherwise entries group by origin. A directory
/// (or filter) matching nothing yields a document with empty `paths`.
pub fn generate_spec(
    har_directory: impl AsRef<Path>,
    base_url: Option<&str>,
    include_constraints: bool,
) -> Result<serde_json::Value, Error> {
    let entries = HarReader::new(har_directory).entries()?;
    let api_spec = ApiSpecBuilder::new().build_spec(&entries, base_url);
    Ok(OpenApiSpecGenerator::new(include_constraints).generate_spec(&api_spec))
}
