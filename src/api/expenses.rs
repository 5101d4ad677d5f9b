use reqwest::blocking::multipart::Form;
use std::path::Path;
use uuid::Uuid;

use crate::client::{with_query, ApiClient};
use crate::error::{ClientError, Result};
use crate::models::{
    AddAttachmentRequest, AddCommentRequest, AuditLog, BulkApproveRequest, BulkApproveResult,
    CreateExpenseRequest, CreatedId, ExpenseComment, ExpenseQuery, ExpenseRequest, PagedResult,
    RejectExpenseRequest, UpdateExpenseRequest,
};

impl ApiClient {
    // ========================================================================
    // LISTS
    // ========================================================================

    /// GET /expenses - the caller's own expenses
    pub fn my_expenses(&self, query: &ExpenseQuery) -> Result<PagedResult<ExpenseRequest>> {
        self.get(&with_query("/expenses", &query.to_query_string()))
    }

    /// GET /expenses/pending - submitted expenses awaiting a decision
    pub fn pending_expenses(&self, query: &ExpenseQuery) -> Result<PagedResult<ExpenseRequest>> {
        self.get(&with_query("/expenses/pending", &query.to_query_string()))
    }

    pub fn expense(&self, id: Uuid) -> Result<ExpenseRequest> {
        self.get(&format!("/expenses/{}", id))
    }

    // ========================================================================
    // DRAFT LIFECYCLE
    // ========================================================================

    pub fn create_expense(&self, data: &CreateExpenseRequest) -> Result<CreatedId> {
        self.post("/expenses", data)
    }

    pub fn update_expense(&self, id: Uuid, data: &UpdateExpenseRequest) -> Result<()> {
        self.put_unit(&format!("/expenses/{}", id), data)
    }

    pub fn delete_expense(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/expenses/{}", id))
    }

    pub fn submit_expense(&self, id: Uuid) -> Result<()> {
        self.post_empty(&format!("/expenses/{}/submit", id))
    }

    pub fn add_attachment(&self, id: Uuid, attachment_url: &str) -> Result<()> {
        self.post_unit(
            &format!("/expenses/{}/attachments", id),
            &AddAttachmentRequest {
                attachment_url: attachment_url.to_string(),
            },
        )
    }

    /// Multipart upload; the file goes in the `file` field.
    pub fn upload_receipt(&self, id: Uuid, file: &Path) -> Result<()> {
        if !file.is_file() {
            return Err(ClientError::invalid(format!(
                "Receipt file not found: {}",
                file.display()
            )));
        }
        let form = Form::new().file("file", file)?;
        self.post_multipart(&format!("/expenses/{}/upload-receipt", id), form)
    }

    // ========================================================================
    // APPROVALS
    // ========================================================================

    pub fn approve_expense(&self, id: Uuid) -> Result<()> {
        self.post_empty(&format!("/expenses/{}/approve", id))
    }

    pub fn reject_expense(&self, id: Uuid, reason: &str) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClientError::invalid("Please provide a rejection reason"));
        }
        self.post_unit(
            &format!("/expenses/{}/reject", id),
            &RejectExpenseRequest {
                reason: reason.to_string(),
            },
        )
    }

    /// POST /expenses/bulk-approve
    pub fn bulk_approve(&self, ids: &[Uuid]) -> Result<BulkApproveResult> {
        if ids.is_empty() {
            return Err(ClientError::invalid("Select at least one expense to approve."));
        }
        self.post(
            "/expenses/bulk-approve",
            &BulkApproveRequest { ids: ids.to_vec() },
        )
    }

    /// No bulk endpoint exists for rejection: one request per id, in order,
    /// stopping at the first failure. Returns how many were rejected.
    pub fn bulk_reject(&self, ids: &[Uuid], reason: &str) -> Result<usize> {
        if ids.is_empty() {
            return Err(ClientError::invalid("Select at least one expense to reject."));
        }
        if reason.trim().is_empty() {
            return Err(ClientError::invalid("Rejection reason is required."));
        }
        for id in ids {
            self.reject_expense(*id, reason)?;
        }
        Ok(ids.len())
    }

    // ========================================================================
    // HISTORY & DISCUSSION
    // ========================================================================

    pub fn audit_history(&self, id: Uuid) -> Result<Vec<AuditLog>> {
        self.get(&format!("/expenses/{}/audit-history", id))
    }

    pub fn comments(&self, id: Uuid) -> Result<Vec<ExpenseComment>> {
        self.get(&format!("/expenses/{}/comments", id))
    }

    pub fn add_comment(&self, id: Uuid, text: &str) -> Result<ExpenseComment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::invalid("Comment cannot be empty"));
        }
        self.post(
            &format!("/expenses/{}/comments", id),
            &AddCommentRequest {
                text: text.to_string(),
            },
        )
    }
}
