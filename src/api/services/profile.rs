//! `/profile`, `/social-links` and the public page

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use super::helpers::{SuccessBody, respond};
use super::types::{CreateSocialLinkBody, UpdateProfileBody};
use crate::api::middleware::AuthenticatedUser;
use crate::services::ProfileService;

pub async fn get_profile(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService>,
) -> HttpResponse {
    respond(StatusCode::OK, profiles.get_own(&user.user_id).await)
}

pub async fn update_profile(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService>,
    body: web::Json<UpdateProfileBody>,
) -> HttpResponse {
    let result = profiles
        .update_own(&user.user_id, body.into_inner().into())
        .await;
    respond(StatusCode::OK, result)
}

pub async fn list_social_links(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService>,
) -> HttpResponse {
    respond(StatusCode::OK, profiles.list_social(&user.user_id).await)
}

pub async fn create_social_link(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService>,
    body: web::Json<CreateSocialLinkBody>,
) -> HttpResponse {
    let result = profiles
        .add_social(&user.user_id, body.into_inner().into())
        .await;
    respond(StatusCode::CREATED, result)
}

pub async fn delete_social_link(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService>,
    path: web::Path<String>,
) -> HttpResponse {
    let result = profiles
        .remove_social(&user.user_id, &path.into_inner())
        .await
        .map(|_| SuccessBody::ok());
    respond(StatusCode::OK, result)
}

/// `GET /public/{username}`, no authentication
pub async fn public_page(
    profiles: web::Data<ProfileService>,
    path: web::Path<String>,
) -> HttpResponse {
    respond(StatusCode::OK, profiles.public_page(&path.into_inner()).await)
}
