//! Catalog pages: books and their copies

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tera::Context;

use crate::{
    error::AppResult,
    forms::{BookForm, CopyForm},
    models::Book,
    pagination::{ListParams, ListRequest, ViewState},
    AppState,
};

use super::{empty_message, page_context, render, render_with_status, InlineErrors, Session};

pub async fn list_books(
    State(state): State<AppState>,
    Session(token): Session,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let view = ViewState::from_params(&params);
    let mut context = page_context("books");

    match state.services.catalog.list_books(&token, &view.request()).await {
        Ok(page) => {
            context.insert("books", &page.items);
            context.insert("pager", &view.pager("/books", page.total_count));
        }
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("books", &Vec::<Book>::new());
            context.insert("pager", &view.pager("/books", 0));
        }
    }
    context.insert("empty_message", &empty_message("books", view.query.as_deref()));

    Ok(render(&state, "books/list.html", &context)?.into_response())
}

fn book_form_context(form: &BookForm, action: &str, title: &str) -> Context {
    let mut context = page_context("books");
    context.insert("form", form);
    context.insert("action", action);
    context.insert("title", title);
    context
}

pub async fn new_book_page(State(state): State<AppState>, Session(_): Session) -> AppResult<Response> {
    let context = book_form_context(&BookForm::default(), "/books/new", "Add Book");
    Ok(render(&state, "books/form.html", &context)?.into_response())
}

pub async fn create_book(
    State(state): State<AppState>,
    Session(token): Session,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.catalog.create_book(&token, &form).await {
        Ok(book) => {
            tracing::info!("Created book {}", book.id);
            Ok(Redirect::to(&format!("/books/{}", book.id)).into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let mut context = book_form_context(&form, "/books/new", "Add Book");
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "books/form.html", &context)
        }
    }
}

/// Book detail with a paginated list of its copies
pub async fn book_detail(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let mut context = page_context("books");

    let book = match state.services.catalog.get_book(&token, &id).await {
        Ok(book) => book,
        Err(err) => {
            let status = if err.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            InlineErrors::capture(err)?.insert_into(&mut context);
            return render_with_status(&state, status, "books/detail.html", &context);
        }
    };

    let view = ViewState::from_params(&params);
    let path = format!("/books/{}", book.id);
    match state
        .services
        .catalog
        .list_copies(&token, &book.id, &view.request())
        .await
    {
        Ok(page) => {
            context.insert("copies", &page.items);
            context.insert("pager", &view.pager(&path, page.total_count));
        }
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("copies", &Vec::<()>::new());
            context.insert("pager", &view.pager(&path, 0));
        }
    }
    context.insert("book", &book);

    Ok(render(&state, "books/detail.html", &context)?.into_response())
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let action = format!("/books/{}/edit", id);
    match state.services.catalog.get_book(&token, &id).await {
        Ok(book) => {
            let form = BookForm {
                title: Some(book.title),
                author: Some(book.author),
                isbn: Some(book.isbn),
            };
            let context = book_form_context(&form, &action, "Edit Book");
            Ok(render(&state, "books/form.html", &context)?.into_response())
        }
        Err(err) => {
            let status = if err.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            let mut context = book_form_context(&BookForm::default(), &action, "Edit Book");
            InlineErrors::capture(err)?.insert_into(&mut context);
            render_with_status(&state, status, "books/form.html", &context)
        }
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.catalog.update_book(&token, &id, &form).await {
        Ok(book) => {
            tracing::info!("Updated book {}", book.id);
            Ok(Redirect::to(&format!("/books/{}", id)).into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let action = format!("/books/{}/edit", id);
            let mut context = book_form_context(&form, &action, "Edit Book");
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "books/form.html", &context)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewCopyParams {
    pub book_id: Option<String>,
}

/// Copy form with the book picker filled in
async fn copy_form_context(state: &AppState, token: &str, form: &CopyForm) -> AppResult<Context> {
    let mut context = page_context("books");
    context.insert("form", form);
    match state
        .services
        .catalog
        .list_books(token, &ListRequest::picker())
        .await
    {
        Ok(page) => context.insert("books", &page.items),
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("books", &Vec::<Book>::new());
        }
    }
    Ok(context)
}

pub async fn new_copy_page(
    State(state): State<AppState>,
    Session(token): Session,
    Query(params): Query<NewCopyParams>,
) -> AppResult<Response> {
    let form = CopyForm {
        book_id: params.book_id,
        copy_number: None,
    };
    let context = copy_form_context(&state, &token, &form).await?;
    Ok(render(&state, "books/copy_form.html", &context)?.into_response())
}

pub async fn create_copy(
    State(state): State<AppState>,
    Session(token): Session,
    Form(form): Form<CopyForm>,
) -> AppResult<Response> {
    match state.services.catalog.create_copy(&token, &form).await {
        Ok(copy) => {
            tracing::info!("Added copy {} to book {}", copy.copy_number, copy.book_id);
            let book_id = if copy.book_id.is_empty() {
                form.book_id.unwrap_or_default()
            } else {
                copy.book_id
            };
            Ok(Redirect::to(&format!("/books/{}", book_id.trim())).into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let mut context = copy_form_context(&state, &token, &form).await?;
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "books/copy_form.html", &context)
        }
    }
}
