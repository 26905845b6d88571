//! # Farmácia API
//!
//! HTTP server for the pharmacy inventory: user registration and login,
//! categories and products, with every non-public route behind HTTP Basic
//! authentication.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Server                                       │
//! │                                                                         │
//! │  Client ──► TraceLayer ──► TimeoutLayer ──► Router                     │
//! │                                               │                         │
//! │                      ┌────────────────────────┴──────────┐              │
//! │                      ▼                                   ▼              │
//! │               public routes                 Access Gate (auth.rs)       │
//! │                      │                                   │              │
//! │                      └──────────► Services ◄─────────────┘              │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                               farmacia-db (SQLite)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::services::{AuthService, CategoryService, ProductService};
use farmacia_core::CredentialHasher;
use farmacia_db::Database;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub users: AuthService,
    pub categories: CategoryService,
    pub products: ProductService,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the services over one database handle.
    pub fn new(db: Database, config: ApiConfig, hasher: CredentialHasher) -> Self {
        AppState {
            users: AuthService::new(Arc::new(db.users()), hasher),
            categories: CategoryService::new(db.categories()),
            products: ProductService::new(db.products(), db.categories()),
            db,
            config,
        }
    }
}

/// Builds the full router: public and protected routes, request tracing and
/// the request timeout.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .merge(routes::public_routes())
        .merge(routes::protected_routes(state.clone()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
        .with_state(state)
}
