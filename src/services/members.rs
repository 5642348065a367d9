//! Member management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    forms::MemberForm,
    models::Member,
    pagination::{compute_request, ListRequest},
    rpc::{
        messages::{
            total_count, CreateMemberRequest, GetMemberRequest, ListMembersRequest,
            UpdateMemberRequest,
        },
        Code, LibraryBackend, RpcFailure,
    },
    validation::trim,
};

use super::Page;

#[derive(Clone)]
pub struct MembersService {
    backend: Arc<dyn LibraryBackend>,
}

impl MembersService {
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self { backend }
    }

    pub async fn list_members(&self, token: &str, request: &ListRequest) -> AppResult<Page<Member>> {
        let request = compute_request(request.page, request.limit, request.query.as_deref());
        let response = self
            .backend
            .list_members(
                token,
                ListMembersRequest {
                    pagination: (&request).into(),
                    query: request.query,
                },
            )
            .await?;

        Ok(Page {
            total_count: total_count(response.pagination.as_ref()),
            items: response.members,
        })
    }

    pub async fn get_member(&self, token: &str, id: &str) -> AppResult<Member> {
        let response = self
            .backend
            .get_member(token, GetMemberRequest { id: id.to_string() })
            .await?;
        response
            .member
            .ok_or_else(|| RpcFailure::status(Code::NotFound, "Member not found").into())
    }

    pub async fn create_member(&self, token: &str, form: &MemberForm) -> AppResult<Member> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = CreateMemberRequest {
            name: trim(form.name.as_deref()),
            email: trim(form.email.as_deref()),
        };
        let response = self.backend.create_member(token, request).await?;
        response.member.ok_or(AppError::EmptyResponse("CreateMember"))
    }

    pub async fn update_member(&self, token: &str, id: &str, form: &MemberForm) -> AppResult<Member> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = UpdateMemberRequest {
            id: id.to_string(),
            name: trim(form.name.as_deref()),
            email: trim(form.email.as_deref()),
        };
        let response = self.backend.update_member(token, request).await?;
        response.member.ok_or(AppError::EmptyResponse("UpdateMember"))
    }
}
