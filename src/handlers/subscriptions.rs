//! Subscription toggle and the two membership reads.

use axum::{extract::Path, Extension};
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{SubscribedChannel, SubscriberEntry};
use crate::database::repos::{subscriptions, users};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validate;

/// POST /api/v1/subscriptions/c/:channelId - Toggle a subscription
pub async fn toggle(
    Extension(user): Extension<AuthUser>,
    Path(channel_id): Path<String>,
) -> ApiResult<Value> {
    let channel = validate::parse_id(&channel_id, "Channel")?;

    // Self-subscription is always rejected, whatever the current state
    if channel == user.id {
        return Err(ApiError::bad_request("You cannot subscribe to your own channel"));
    }

    let pool = DatabaseManager::pool().await?;
    if !users::exists(&pool, channel).await? {
        return Err(ApiError::not_found("Channel not found"));
    }

    let subscribed = subscriptions::toggle(&pool, user.id, channel).await?;
    let message = if subscribed { "Subscribed successfully" } else { "Unsubscribed successfully" };

    Ok(ApiResponse::ok(json!({ "subscribed": subscribed }), message))
}

/// GET /api/v1/subscriptions/c/:channelId - Subscriber list of a channel
pub async fn channel_subscribers(
    Path(channel_id): Path<String>,
) -> ApiResult<Vec<SubscriberEntry>> {
    let channel = validate::parse_id(&channel_id, "Channel")?;

    let pool = DatabaseManager::pool().await?;
    let subscribers = subscriptions::subscribers(&pool, channel).await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

/// GET /api/v1/subscriptions/u/:subscriberId - Channels a user subscribes to
pub async fn subscribed_channels(
    Path(subscriber_id): Path<String>,
) -> ApiResult<Vec<SubscribedChannel>> {
    let subscriber = validate::parse_id(&subscriber_id, "Subscriber")?;

    let pool = DatabaseManager::pool().await?;
    let channels = subscriptions::subscribed_channels(&pool, subscriber).await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully"))
}
