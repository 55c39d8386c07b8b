pub mod admin;
pub mod attendance;
pub mod reports;
pub mod schedule;
pub mod status;

use crate::bot::{Context, Error};
use crate::database::models::User;
use crate::database::queries;
use crate::utils::format::create_error_embed;
use std::collections::HashMap;

/// Passes when the caller holds the configured admin role. Without
/// `ADMIN_ROLE_ID` nobody is an admin.
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(role_id) = ctx.data().config.admin_role_id else {
        return Ok(false);
    };

    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    Ok(member.roles.iter().any(|role| role.get() == role_id))
}

/// Maps the invoking Discord account to a staff user, replying with an error
/// embed when the lookup fails.
pub async fn resolve_author(ctx: Context<'_>) -> Result<Option<User>, Error> {
    let discord_id = ctx.author().id.to_string();
    let username = ctx.author().name.clone();

    match queries::create_or_get_user(&ctx.data().pool, &discord_id, &username).await {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            tracing::error!(discord_id = %discord_id, "Failed to load user: {:?}", e);
            send_error(ctx, "Failed to load your staff profile").await?;
            Ok(None)
        }
    }
}

pub async fn send_error(ctx: Context<'_>, message: &str) -> Result<(), Error> {
    let embed = create_error_embed("Error", message);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Display name for a staff id, cached per command invocation.
pub async fn staff_name(
    pool: &sqlx::SqlitePool,
    names: &mut HashMap<i64, String>,
    staff_id: i64,
) -> String {
    if let Some(name) = names.get(&staff_id) {
        return name.clone();
    }

    let name = match queries::get_user_by_id(pool, staff_id).await {
        Ok(user) => user.username,
        Err(e) => {
            tracing::warn!(staff_id, "Unknown staff id: {:?}", e);
            format!("user {}", staff_id)
        }
    };
    names.insert(staff_id, name.clone());
    name
}
