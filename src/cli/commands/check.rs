use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::utils::format_table;
use crate::cli::OutputFormat;
use crate::database::{ForumRepository, MemoryForumRepository, SiteFixture};
use crate::domain::{Member, PermissionType, RoleId};
use crate::security::{ForumPermissions, MemberContext, PermissionModelBuilder};

pub async fn handle(
    fixture: PathBuf,
    forum_id: Uuid,
    member_id: Option<Uuid>,
    roles: Vec<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let fixture = SiteFixture::load(&fixture)?;
    let site_id = fixture.site_id;
    let repository: Arc<dyn ForumRepository> =
        Arc::new(MemoryForumRepository::new(fixture.into_data()?));

    let ctx = member_context(repository.as_ref(), site_id, member_id, roles).await?;

    let models = PermissionModelBuilder::new(repository.clone())
        .build_permission_models_by_forum_id(site_id, forum_id)
        .await
        .with_context(|| format!("cannot resolve permissions for forum {}", forum_id))?;
    let permissions = ForumPermissions::resolve(&ctx, &models);

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "site_id": site_id,
                    "forum_id": forum_id,
                    "member": ctx.display_name(),
                    "roles": ctx.effective_roles(),
                    "suspended": ctx.is_suspended(),
                    "permissions": permissions,
                    "rules": models,
                }))?
            );
        }
        OutputFormat::Text => {
            let roles: Vec<String> = ctx.effective_roles().iter().map(RoleId::to_string).collect();
            println!("Member: {}", ctx.display_name());
            println!("Roles: {}", roles.join(", "));
            if ctx.is_suspended() {
                println!("Suspended: yes");
            }
            if models.is_empty() {
                println!("No permission set applies to this forum; everything is denied.");
            }
            println!();

            let rows: Vec<Vec<String>> = PermissionType::ALL
                .iter()
                .map(|t| {
                    let allowed = if permissions.allows(*t) { "yes" } else { "no" };
                    vec![t.to_string(), allowed.to_string()]
                })
                .collect();
            println!("{}", format_table(&["PERMISSION", "ALLOWED"], &rows));
        }
    }

    Ok(())
}

/// Fixture member (plus any extra roles), or an ad-hoc member when only
/// roles are given, or anonymous.
async fn member_context(
    repository: &dyn ForumRepository,
    site_id: Uuid,
    member_id: Option<Uuid>,
    roles: Vec<String>,
) -> anyhow::Result<MemberContext> {
    let extra_roles = roles.into_iter().map(RoleId::from);

    let member = match member_id {
        Some(id) => {
            let mut member = repository
                .member(site_id, id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Member '{}' not found in fixture", id))?;
            member.roles.extend(extra_roles);
            Some(member)
        }
        None => {
            let roles: Vec<RoleId> = extra_roles.collect();
            (!roles.is_empty()).then(|| Member {
                id: Uuid::new_v4(),
                site_id,
                display_name: "cli".to_string(),
                roles,
                status: Default::default(),
            })
        }
    };

    Ok(match member {
        Some(member) => MemberContext::authenticated(site_id, member),
        None => MemberContext::anonymous(site_id),
    })
}
