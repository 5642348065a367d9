//! Loan pages: current borrowings, borrow, return

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;
use tera::Context;

use crate::{
    error::AppResult,
    forms::{BorrowForm, ReturnForm},
    models::{AvailableCopy, Borrow, Member},
    pagination::{ListParams, ListRequest, ViewState},
    AppState,
};

use super::{empty_message, page_context, render, render_with_status, InlineErrors, Session};

/// Borrow flattened for display
#[derive(Debug, Serialize)]
pub struct BorrowRow {
    pub copy_id: String,
    pub book_title: String,
    pub copy_number: String,
    pub member_id: String,
    pub member_name: String,
    pub borrowed_on: String,
    pub returned_on: Option<String>,
}

pub fn borrow_rows(borrows: &[Borrow]) -> Vec<BorrowRow> {
    borrows
        .iter()
        .map(|borrow| BorrowRow {
            copy_id: borrow.copy_id.clone(),
            book_title: borrow.book_title().to_string(),
            copy_number: borrow.copy_number().to_string(),
            member_id: borrow.member_id.clone(),
            member_name: borrow.member_name().to_string(),
            borrowed_on: borrow.borrowed_on(),
            returned_on: borrow.returned_on(),
        })
        .collect()
}

pub async fn list_borrowings(
    State(state): State<AppState>,
    Session(token): Session,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let view = ViewState::from_params(&params);
    let mut context = page_context("borrowings");

    match state
        .services
        .loans
        .list_borrowings(&token, &view.request(), None)
        .await
    {
        Ok(page) => {
            context.insert("borrows", &borrow_rows(&page.items));
            context.insert("pager", &view.pager("/borrowings", page.total_count));
        }
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("borrows", &Vec::<BorrowRow>::new());
            context.insert("pager", &view.pager("/borrowings", 0));
        }
    }
    context.insert(
        "empty_message",
        &empty_message("borrowings", view.query.as_deref()),
    );

    Ok(render(&state, "loans/list.html", &context)?.into_response())
}

#[derive(Serialize)]
struct CopyOption {
    id: String,
    label: String,
}

/// Borrow form with both pickers; the two lists are fetched concurrently
async fn borrow_context(state: &AppState, token: &str, form: &BorrowForm) -> AppResult<Context> {
    let mut context = page_context("borrowings");
    context.insert("form", form);

    let picker = ListRequest::picker();
    let loaded = tokio::try_join!(
        state.services.loans.list_available_copies(token, &picker),
        state.services.members.list_members(token, &picker),
    );
    match loaded {
        Ok((copies, members)) => {
            let copies: Vec<CopyOption> = copies
                .items
                .iter()
                .map(|copy| CopyOption {
                    id: copy.id.clone(),
                    label: copy.label(),
                })
                .collect();
            context.insert("copies", &copies);
            context.insert("members", &members.items);
        }
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("copies", &Vec::<AvailableCopy>::new());
            context.insert("members", &Vec::<Member>::new());
        }
    }
    Ok(context)
}

pub async fn borrow_page(State(state): State<AppState>, Session(token): Session) -> AppResult<Response> {
    let context = borrow_context(&state, &token, &BorrowForm::default()).await?;
    Ok(render(&state, "loans/borrow.html", &context)?.into_response())
}

pub async fn borrow_book(
    State(state): State<AppState>,
    Session(token): Session,
    Form(form): Form<BorrowForm>,
) -> AppResult<Response> {
    match state.services.loans.borrow_book(&token, &form).await {
        Ok(borrow) => {
            tracing::info!("Copy {} borrowed by member {}", borrow.copy_id, borrow.member_id);
            Ok(Redirect::to("/borrowings").into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let mut context = borrow_context(&state, &token, &form).await?;
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "loans/borrow.html", &context)
        }
    }
}

/// Borrowed copies as return picker options ("Dune - C-001 - Ada")
fn return_options(borrows: &[Borrow]) -> Vec<CopyOption> {
    borrows
        .iter()
        .filter(|borrow| !borrow.is_returned())
        .map(|borrow| {
            let title = match borrow.book_title() {
                "" => "Book",
                title => title,
            };
            let copy = match borrow.copy_number() {
                "" => borrow.copy_id.as_str(),
                number => number,
            };
            let member = match borrow.member_name() {
                "" => "Member",
                name => name,
            };
            CopyOption {
                id: borrow.copy_id.clone(),
                label: format!("{} - {} - {}", title, copy, member),
            }
        })
        .collect()
}

async fn return_context(state: &AppState, token: &str, form: &ReturnForm) -> AppResult<Context> {
    let mut context = page_context("borrowings");
    context.insert("form", form);

    match state
        .services
        .loans
        .list_borrowings(token, &ListRequest::picker(), None)
        .await
    {
        Ok(page) => context.insert("copies", &return_options(&page.items)),
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("copies", &Vec::<CopyOption>::new());
        }
    }
    Ok(context)
}

pub async fn return_page(State(state): State<AppState>, Session(token): Session) -> AppResult<Response> {
    let context = return_context(&state, &token, &ReturnForm::default()).await?;
    Ok(render(&state, "loans/return.html", &context)?.into_response())
}

pub async fn return_book(
    State(state): State<AppState>,
    Session(token): Session,
    Form(form): Form<ReturnForm>,
) -> AppResult<Response> {
    match state.services.loans.return_book(&token, &form).await {
        Ok(borrow) => {
            tracing::info!("Copy {} returned", borrow.copy_id);
            Ok(Redirect::to("/borrowings").into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let mut context = return_context(&state, &token, &form).await?;
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "loans/return.html", &context)
        }
    }
}
