//! Read access to the SMS audit log.

use crate::AppResources;
use crate::entity::cow;
use crate::entity::message::{self, MessageType};
use axum::{Extension, Json, extract::Query, http::StatusCode, response::IntoResponse};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const MESSAGES_TAG: &str = "Messages API";

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MessageFilter {
    pub farm_id: Option<String>,
    /// Farm-local cow tag; only honoured together with `farm_id`.
    pub cow_id: Option<String>,
    /// Whitespace-separated terms; each must appear in the text or the type.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
    /// Defaults to 50, capped at 100.
    pub page_size: Option<u64>,
}

impl MessageFilter {
    fn page_size(&self) -> u64 {
        match self.page_size {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageDto {
    pub id: i32,
    pub farm_id: String,
    /// Tag of the cow the message is about, if any.
    pub cow_id: Option<String>,
    pub message_text: String,
    pub message_type: MessageType,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub sent_date: OffsetDateTime,
    pub is_sent: bool,
}

impl From<(message::Model, Option<cow::Model>)> for MessageDto {
    fn from((m, cow): (message::Model, Option<cow::Model>)) -> Self {
        Self {
            id: m.id,
            message_type: m.kind(),
            farm_id: m.farm_id,
            cow_id: cow.map(|c| c.cow_id),
            message_text: m.message_text,
            sent_date: m.sent_date,
            is_sent: m.is_sent,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessagesListResponse {
    /// Total matching messages across all pages.
    pub count: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<MessageDto>,
}

impl MessagesListResponse {
    fn empty(page_size: u64) -> Self {
        Self {
            count: 0,
            total_pages: 1,
            current_page: 1,
            page_size,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(list_messages))
}

fn search_condition(search: &str) -> Condition {
    search
        .split_whitespace()
        .fold(Condition::all(), |all, term| {
            all.add(
                Condition::any()
                    .add(message::Column::MessageText.contains(term))
                    .add(message::Column::MessageType.contains(term)),
            )
        })
}

fn query_failed(e: sea_orm::DbErr) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!(
        name = "api.messages.query_failed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        error = %e,
        message = "Failed to list messages"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to list messages" })),
    )
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    get,
    path = "/",
    params(MessageFilter),
    tag = MESSAGES_TAG,
    operation_id = "List Messages",
    summary = "List recorded SMS messages",
    description = "Newest first, paginated. Pending same-day alert claims are included with \
                   `is_sent = false`. A `cow_id` without a `farm_id` matches nothing.",
    responses(
        (status = 200, description = "Messages", body = MessagesListResponse),
        (status = 404, description = "Page out of range", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn list_messages(
    Extension(resources): Extension<AppResources>,
    Query(filter): Query<MessageFilter>,
) -> impl IntoResponse {
    let page_size = filter.page_size();
    if filter.cow_id.is_some() && filter.farm_id.is_none() {
        return (
            StatusCode::OK,
            Json(json!(MessagesListResponse::empty(page_size))),
        );
    }

    let mut query = message::Entity::find()
        .find_also_related(cow::Entity)
        .filter(message::Column::IsDeleted.eq(false));
    if let Some(farm_id) = &filter.farm_id {
        query = query.filter(message::Column::FarmId.eq(farm_id.as_str()));
        if let Some(tag) = &filter.cow_id {
            query = query.filter(cow::Column::CowId.eq(tag.as_str()));
        }
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(search_condition(search));
    }

    let paginator = query
        .order_by_desc(message::Column::SentDate)
        .order_by_desc(message::Column::Id)
        .paginate(resources.db.as_ref(), page_size);
    let totals = match paginator.num_items_and_pages().await {
        Ok(totals) => totals,
        Err(e) => return query_failed(e),
    };
    let total_pages = totals.number_of_pages.max(1);
    let page = filter.page.unwrap_or(1);
    if page == 0 || page > total_pages {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Invalid page." })),
        );
    }

    match paginator.fetch_page(page - 1).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(json!(MessagesListResponse {
                count: totals.number_of_items,
                total_pages,
                current_page: page,
                page_size,
                next: (page < total_pages).then_some(page + 1),
                previous: (page > 1).then_some(page - 1),
                results: rows.into_iter().map(MessageDto::from).collect(),
            })),
        ),
        Err(e) => query_failed(e),
    }
}
