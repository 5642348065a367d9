//! Librarian web console
//!
//! Server-rendered administrative console for a library management backend:
//! catalog, members and loans, driven through the backend's RPC interface.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tera::Tera;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod rpc;
pub mod services;
pub mod validation;
pub mod web;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub templates: Arc<Tera>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(web::auth::index))
        .route("/health", get(web::health::health_check))
        // Session
        .route("/login", get(web::auth::login_page).post(web::auth::login))
        .route("/logout", post(web::auth::logout))
        // Catalog
        .route("/books", get(web::books::list_books))
        .route("/books/new", get(web::books::new_book_page).post(web::books::create_book))
        .route(
            "/books/copies/new",
            get(web::books::new_copy_page).post(web::books::create_copy),
        )
        .route("/books/:id", get(web::books::book_detail))
        .route(
            "/books/:id/edit",
            get(web::books::edit_book_page).post(web::books::update_book),
        )
        // Members
        .route("/members", get(web::members::list_members))
        .route(
            "/members/new",
            get(web::members::new_member_page).post(web::members::create_member),
        )
        .route(
            "/members/:id",
            get(web::members::edit_member_page).post(web::members::update_member),
        )
        // Loans
        .route("/borrowings", get(web::loans::list_borrowings))
        .route("/borrow", get(web::loans::borrow_page).post(web::loans::borrow_book))
        .route("/return", get(web::loans::return_page).post(web::loans::return_book))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
