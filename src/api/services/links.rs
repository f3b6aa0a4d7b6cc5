//! `/links` handlers
//!
//! Authentication runs first, then admission, then the JSON body is parsed, so
//! a malformed body still spends the caller's budget. Every response after
//! admission carries `X-RateLimit-Remaining`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};

use super::helpers::{SuccessBody, parse_json_body, respond, with_remaining};
use super::types::{CreateLinkBody, ReorderBody, TrackBody, UpdateLinkBody};
use crate::api::middleware::AuthenticatedUser;
use crate::errors::LinkhubError;
use crate::rate_limit::LinkOperation;
use crate::services::LinkService;
use crate::utils::ip::extract_client_ip;

type HandlerResult = Result<HttpResponse, LinkhubError>;

pub async fn list_links(user: AuthenticatedUser, links: web::Data<LinkService>) -> HandlerResult {
    let remaining = links.admit(LinkOperation::List, &user.user_id).await?;
    let result = links.list(&user.user_id).await;
    Ok(with_remaining(respond(StatusCode::OK, result), remaining))
}

pub async fn create_link(
    user: AuthenticatedUser,
    links: web::Data<LinkService>,
    body: web::Bytes,
) -> HandlerResult {
    let remaining = links.admit(LinkOperation::Create, &user.user_id).await?;
    let result = match parse_json_body::<CreateLinkBody>(&body) {
        Ok(body) => links.create(&user.user_id, body.into()).await,
        Err(e) => Err(e),
    };
    Ok(with_remaining(respond(StatusCode::CREATED, result), remaining))
}

pub async fn update_link(
    user: AuthenticatedUser,
    links: web::Data<LinkService>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HandlerResult {
    let remaining = links.admit(LinkOperation::Update, &user.user_id).await?;
    let result = match parse_json_body::<UpdateLinkBody>(&body) {
        Ok(body) => {
            links
                .update(&user.user_id, &path.into_inner(), body.into())
                .await
        }
        Err(e) => Err(e),
    };
    Ok(with_remaining(respond(StatusCode::OK, result), remaining))
}

pub async fn toggle_link(
    user: AuthenticatedUser,
    links: web::Data<LinkService>,
    path: web::Path<String>,
) -> HandlerResult {
    let remaining = links.admit(LinkOperation::Update, &user.user_id).await?;
    let result = links.toggle_active(&user.user_id, &path.into_inner()).await;
    Ok(with_remaining(respond(StatusCode::OK, result), remaining))
}

pub async fn delete_link(
    user: AuthenticatedUser,
    links: web::Data<LinkService>,
    path: web::Path<String>,
) -> HandlerResult {
    let remaining = links.admit(LinkOperation::Delete, &user.user_id).await?;
    let result = links
        .delete(&user.user_id, &path.into_inner())
        .await
        .map(|_| SuccessBody::ok());
    Ok(with_remaining(respond(StatusCode::OK, result), remaining))
}

pub async fn reorder_links(
    user: AuthenticatedUser,
    links: web::Data<LinkService>,
    body: web::Bytes,
) -> HandlerResult {
    let remaining = links.admit(LinkOperation::Update, &user.user_id).await?;
    let result = match parse_json_body::<ReorderBody>(&body) {
        Ok(body) => links.reorder(&user.user_id, &body.ids).await,
        Err(e) => Err(e),
    };
    Ok(with_remaining(respond(StatusCode::OK, result), remaining))
}

/// Public click tracking, limited per client IP
pub async fn track_click(
    req: HttpRequest,
    links: web::Data<LinkService>,
    body: web::Bytes,
) -> HandlerResult {
    let client_ip = extract_client_ip(&req);
    let remaining = links.admit(LinkOperation::Track, &client_ip).await?;
    let result = match parse_json_body::<TrackBody>(&body) {
        Ok(body) => links.track(&body.link_id).await.map(|_| SuccessBody::ok()),
        Err(e) => Err(e),
    };
    Ok(with_remaining(respond(StatusCode::OK, result), remaining))
}
