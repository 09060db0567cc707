//! Print the OpenAPI document as JSON.

use herdbook::ApiDoc;
use utoipa::OpenApi;

#[expect(clippy::print_stdout, reason = "the document is written to stdout for tooling")]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
