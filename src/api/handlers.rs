use crate::error::{AppError, AppResult};
use crate::models::{DebitNote, DocumentId, TrialBalance, UpdateDebitNoteRequest};
use crate::service::DebitNoteService;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Json, Path, State},
    http::request::Parts,
};
use serde::Serialize;
use std::sync::Arc;

pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// 当前请求所属组织, 取自 `x-organization-id` 请求头
#[derive(Debug, Clone)]
pub struct OrgContext(pub DocumentId);

#[async_trait]
impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ORGANIZATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(DocumentId::parse)
            .map(OrgContext)
            .ok_or(AppError::Unauthorized)
    }
}

/// 更新响应体
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    #[serde(rename = "savedDebitNote")]
    pub saved_debit_note: DebitNote,
}

fn debit_id(raw: &str) -> AppResult<DocumentId> {
    DocumentId::parse(raw).ok_or_else(|| AppError::not_found("Debit note not found"))
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 更新借项通知单
pub async fn update_debit_note(
    State(service): State<Arc<DebitNoteService>>,
    OrgContext(org): OrgContext,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateDebitNoteRequest>, JsonRejection>,
) -> AppResult<Json<UpdateResponse>> {
    let Json(req) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let id = debit_id(&raw_id)?;

    let saved = service.update(&org, &id, req).await?;

    Ok(Json(UpdateResponse {
        message: "Debit note updated successfully".to_string(),
        saved_debit_note: saved,
    }))
}

pub async fn get_debit_note(
    State(service): State<Arc<DebitNoteService>>,
    OrgContext(org): OrgContext,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DebitNote>> {
    let id = debit_id(&raw_id)?;
    Ok(Json(service.get(&org, &id).await?))
}

/// 通知单的试算平衡分录
pub async fn debit_note_journal(
    State(service): State<Arc<DebitNoteService>>,
    OrgContext(org): OrgContext,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Vec<TrialBalance>>> {
    let id = debit_id(&raw_id)?;
    Ok(Json(service.journal(&org, &id).await?))
}
