//! Member pages

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context;

use crate::{
    error::AppResult,
    forms::MemberForm,
    models::Member,
    pagination::{ListParams, ViewState},
    AppState,
};

use super::{
    empty_message,
    loans::{borrow_rows, BorrowRow},
    page_context, render, render_with_status, InlineErrors, Session,
};

pub async fn list_members(
    State(state): State<AppState>,
    Session(token): Session,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let view = ViewState::from_params(&params);
    let mut context = page_context("members");

    match state.services.members.list_members(&token, &view.request()).await {
        Ok(page) => {
            context.insert("members", &page.items);
            context.insert("pager", &view.pager("/members", page.total_count));
        }
        Err(err) => {
            InlineErrors::capture(err)?.insert_into(&mut context);
            context.insert("members", &Vec::<Member>::new());
            context.insert("pager", &view.pager("/members", 0));
        }
    }
    context.insert("empty_message", &empty_message("members", view.query.as_deref()));

    Ok(render(&state, "members/list.html", &context)?.into_response())
}

fn member_form_context(form: &MemberForm, action: &str, title: &str) -> Context {
    let mut context = page_context("members");
    context.insert("form", form);
    context.insert("action", action);
    context.insert("title", title);
    context.insert("borrows", &Vec::<BorrowRow>::new());
    context
}

pub async fn new_member_page(State(state): State<AppState>, Session(_): Session) -> AppResult<Response> {
    let context = member_form_context(&MemberForm::default(), "/members/new", "Add Member");
    Ok(render(&state, "members/form.html", &context)?.into_response())
}

pub async fn create_member(
    State(state): State<AppState>,
    Session(token): Session,
    Form(form): Form<MemberForm>,
) -> AppResult<Response> {
    match state.services.members.create_member(&token, &form).await {
        Ok(member) => {
            tracing::info!("Created member {}", member.id);
            Ok(Redirect::to("/members").into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let mut context = member_form_context(&form, "/members/new", "Add Member");
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "members/form.html", &context)
        }
    }
}

/// Edit form, with the member's borrowings underneath
pub async fn edit_member_page(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let action = format!("/members/{}", id);

    let member = match state.services.members.get_member(&token, &id).await {
        Ok(member) => member,
        Err(err) => {
            let status = if err.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            let mut context = member_form_context(&MemberForm::default(), &action, "Edit Member");
            InlineErrors::capture(err)?.insert_into(&mut context);
            return render_with_status(&state, status, "members/form.html", &context);
        }
    };

    let form = MemberForm {
        name: Some(member.name),
        email: Some(member.email),
    };
    let mut context = member_form_context(&form, &action, "Edit Member");

    let view = ViewState::from_params(&params);
    match state
        .services
        .loans
        .list_borrowings(&token, &view.request(), Some(member.id.as_str()))
        .await
    {
        Ok(page) => {
            context.insert("borrows", &borrow_rows(&page.items));
            context.insert("pager", &view.pager(&action, page.total_count));
        }
        Err(err) => InlineErrors::capture(err)?.insert_into(&mut context),
    }

    Ok(render(&state, "members/form.html", &context)?.into_response())
}

pub async fn update_member(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    Form(form): Form<MemberForm>,
) -> AppResult<Response> {
    match state.services.members.update_member(&token, &id, &form).await {
        Ok(member) => {
            tracing::info!("Updated member {}", member.id);
            Ok(Redirect::to("/members").into_response())
        }
        Err(err) => {
            let inline = InlineErrors::capture(err)?;
            let action = format!("/members/{}", id);
            let mut context = member_form_context(&form, &action, "Edit Member");
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "members/form.html", &context)
        }
    }
}
