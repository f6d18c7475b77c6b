use serenity::all::{Context, GuildId, Permissions, UserId};

/// Check if a member has administrator permissions
pub async fn is_admin(ctx: &Context, guild_id: GuildId, user_id: UserId) -> bool {
    has_permission(ctx, guild_id, user_id, Permissions::ADMINISTRATOR).await
}

/// Check if a member has a specific permission
pub async fn has_permission(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
    permission: Permissions,
) -> bool {
    if let Ok(member) = guild_id.member(ctx, user_id).await {
        return member.permissions(ctx).map(|p| p.contains(permission)).unwrap_or(false);
    }
    false
}

/// Check if a member may remove other members
pub async fn can_restrict(ctx: &Context, guild_id: GuildId, user_id: UserId) -> bool {
    if let Ok(member) = guild_id.member(ctx, user_id).await {
        return member.permissions(ctx)
            .map(|p| p.administrator() || p.kick_members())
            .unwrap_or(false);
    }
    false
}
