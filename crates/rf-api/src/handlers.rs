//! # rf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! services. Handlers only decode input, run the service call under the
//! request deadline and turn the `Outcome` into a response.

use std::future::Future;
use std::time::Duration;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use rf_core::error::AppError;
use rf_core::models::{NewForum, NewPost, NewThread, NewUser, Related, ThreadUpdate, UserUpdate};
use rf_core::outcome::{ErrorKind, Outcome};
use rf_core::pagination::{PostPage, SortMode, ThreadPage, UserPage};
use rf_core::Services;
use serde::{Deserialize, Serialize};

use crate::error::{status_for, ApiError};

/// State shared across all Actix-web workers.
pub struct AppState {
    pub services: Services,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(services: Services, request_timeout: Duration) -> Self {
        Self {
            services,
            request_timeout,
        }
    }
}

/// Listing query string. `since` is interpreted per endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub since: Option<String>,
    #[serde(default)]
    pub desc: bool,
    pub sort: Option<String>,
}

impl ListParams {
    fn post_page(&self) -> Result<PostPage, ApiError> {
        let since = match self.since.as_deref() {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                ApiError::BadRequest(format!("since must be a post id, got {raw}"))
            })?),
            None => None,
        };
        Ok(PostPage {
            sort: SortMode::parse(self.sort.as_deref()),
            since,
            desc: self.desc,
            limit: self.limit,
        })
    }

    fn thread_page(&self) -> Result<ThreadPage, ApiError> {
        let since = match self.since.as_deref() {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| ApiError::BadRequest(format!("since must be an RFC 3339 time, got {raw}")))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };
        Ok(ThreadPage {
            since,
            desc: self.desc,
            limit: self.limit,
        })
    }

    fn user_page(&self) -> UserPage {
        UserPage {
            since: self.since.clone(),
            desc: self.desc,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsParams {
    pub related: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub nickname: String,
    pub voice: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub message: String,
}

/// Runs `work` under the request deadline. On expiry the future is dropped,
/// which rolls back any transaction it had open.
async fn within<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(state.request_timeout, work).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            log::warn!("request exceeded its {:?} deadline", state.request_timeout);
            Err(ApiError::DeadlineExceeded)
        }
    }
}

fn respond<T: Serialize, C: Serialize>(outcome: Outcome<T, C>) -> HttpResponse {
    match outcome {
        Outcome::Ok(value) => HttpResponse::Ok().json(value),
        Outcome::Created(value) => HttpResponse::Created().json(value),
        Outcome::NotFound(message) => HttpResponse::build(status_for(ErrorKind::NotFound)).json(message),
        Outcome::Conflict(payload) => HttpResponse::build(status_for(ErrorKind::Conflict)).json(payload),
        Outcome::Invalid(message) => {
            HttpResponse::build(status_for(ErrorKind::ValidationFailure)).json(message)
        }
    }
}

// --- users ---

pub async fn create_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewUser>,
) -> Result<HttpResponse, ApiError> {
    let nickname = path.into_inner();
    let outcome = within(&state, state.services.users.create_user(&nickname, body.into_inner())).await?;
    Ok(respond(outcome))
}

pub async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.users.get_profile(&path)).await?;
    Ok(respond(outcome))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UserUpdate>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.users.update_profile(&path, body.into_inner())).await?;
    Ok(respond(outcome))
}

// --- forums ---

pub async fn create_forum(
    state: web::Data<AppState>,
    body: web::Json<NewForum>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.forums.create_forum(body.into_inner())).await?;
    Ok(respond(outcome))
}

pub async fn forum_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.forums.get_forum(&path)).await?;
    Ok(respond(outcome))
}

pub async fn create_thread(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewThread>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.threads.create_thread(&path, body.into_inner())).await?;
    Ok(respond(outcome))
}

pub async fn forum_threads(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let page = query.thread_page()?;
    let outcome = within(&state, state.services.forums.list_threads(&path, &page)).await?;
    Ok(respond(outcome))
}

pub async fn forum_users(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let page = query.user_page();
    let outcome = within(&state, state.services.forums.list_users(&path, &page)).await?;
    Ok(respond(outcome))
}

// --- threads ---

pub async fn create_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Vec<NewPost>>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.posts.create_posts(&path, body.into_inner())).await?;
    Ok(respond(outcome))
}

pub async fn vote(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<VoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(
        &state,
        state.services.threads.vote(&path, &body.nickname, body.voice),
    )
    .await?;
    Ok(respond(outcome))
}

pub async fn thread_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.threads.get_details(&path)).await?;
    Ok(respond(outcome))
}

pub async fn update_thread(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ThreadUpdate>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.threads.update_thread(&path, body.into_inner())).await?;
    Ok(respond(outcome))
}

pub async fn thread_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let page = query.post_page()?;
    let outcome = within(&state, state.services.posts.list_posts(&path, &page)).await?;
    Ok(respond(outcome))
}

// --- posts ---

pub async fn post_details(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<DetailsParams>,
) -> Result<HttpResponse, ApiError> {
    let related = Related::parse_list(query.related.as_deref().unwrap_or_default());
    let outcome = within(&state, state.services.posts.get_details(*path, &related)).await?;
    Ok(respond(outcome))
}

pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PostUpdate>,
) -> Result<HttpResponse, ApiError> {
    let outcome = within(&state, state.services.posts.update_post(*path, &body.message)).await?;
    Ok(respond(outcome))
}

// --- service ---

pub async fn status(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let status = within(&state, state.services.admin.status()).await?;
    Ok(HttpResponse::Ok().json(status))
}

pub async fn clear(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    within(&state, state.services.admin.clear()).await?;
    Ok(HttpResponse::Ok().finish())
}
