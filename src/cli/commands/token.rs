use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub fn handle(site_id: Uuid, member_id: Uuid, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = Claims::new(site_id, member_id);
    let token = generate_jwt(&claims)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token generated",
            Some(json!({
                "token": token,
                "site_id": site_id,
                "member_id": member_id,
                "expires_at": claims.exp,
            })),
        ),
        OutputFormat::Text => {
            // Bare token so it can be captured by shell scripts
            println!("{}", token);
            Ok(())
        }
    }
}
