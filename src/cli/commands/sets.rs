use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{format_table, output_empty_collection};
use crate::cli::OutputFormat;
use crate::database::SiteFixture;

pub fn handle(fixture: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let fixture = SiteFixture::load(&fixture)?;
    let data = fixture.into_data()?;

    if data.permission_sets.is_empty() {
        return output_empty_collection(&output_format, "permission_sets", "No permission sets found");
    }

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "permission_sets": data.permission_sets
                }))?
            );
        }
        OutputFormat::Text => {
            for set in &data.permission_sets {
                let users = data
                    .categories
                    .iter()
                    .filter(|c| c.permission_set_id == Some(set.id))
                    .count()
                    + data
                        .forums
                        .iter()
                        .filter(|f| f.permission_set_id == Some(set.id))
                        .count();

                println!("{} ({}) used by {} categories/forums", set.name, set.id, users);

                let rows: Vec<Vec<String>> = set
                    .permissions()
                    .iter()
                    .map(|p| {
                        vec![
                            p.role_id.to_string(),
                            p.permission_type.to_string(),
                            if p.is_allowed { "allow" } else { "deny" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", format_table(&["ROLE", "PERMISSION", "RULE"], &rows));
                println!();
            }
        }
    }

    Ok(())
}
