use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::timefmt;

/// Amount above which an expense needs a receipt before submission.
pub const RECEIPT_THRESHOLD: f64 = 100.0;

// ============================================================================
// ENUMS (backend sends either the numeric code or the name)
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeOrName {
    Code(i64),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserRole {
    Employee,
    Manager,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Employee, UserRole::Manager, UserRole::Admin];

    pub fn code(&self) -> u8 {
        match self {
            UserRole::Employee => 0,
            UserRole::Manager => 1,
            UserRole::Admin => 2,
        }
    }

    /// Unknown codes fall back to `Employee`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => UserRole::Manager,
            2 => UserRole::Admin,
            _ => UserRole::Employee,
        }
    }

    /// Unknown names fall back to `Employee`.
    pub fn parse(name: &str) -> Self {
        match name {
            "Manager" => UserRole::Manager,
            "Admin" => UserRole::Admin,
            _ => UserRole::Employee,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UserRole::Employee => "Employee",
            UserRole::Manager => "Manager",
            UserRole::Admin => "Admin",
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match CodeOrName::deserialize(deserializer)? {
            CodeOrName::Code(code) => UserRole::from_code(code),
            CodeOrName::Name(name) => UserRole::parse(&name),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub const ALL: [ExpenseStatus; 4] = [
        ExpenseStatus::Draft,
        ExpenseStatus::Submitted,
        ExpenseStatus::Approved,
        ExpenseStatus::Rejected,
    ];

    pub fn code(&self) -> u8 {
        match self {
            ExpenseStatus::Draft => 0,
            ExpenseStatus::Submitted => 1,
            ExpenseStatus::Approved => 2,
            ExpenseStatus::Rejected => 3,
        }
    }

    /// Unknown codes fall back to `Draft`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ExpenseStatus::Submitted,
            2 => ExpenseStatus::Approved,
            3 => ExpenseStatus::Rejected,
            _ => ExpenseStatus::Draft,
        }
    }

    /// Case-insensitive; unknown names fall back to `Draft`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "submitted" => ExpenseStatus::Submitted,
            "approved" => ExpenseStatus::Approved,
            "rejected" => ExpenseStatus::Rejected,
            _ => ExpenseStatus::Draft,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExpenseStatus::Draft => "Draft",
            ExpenseStatus::Submitted => "Submitted",
            ExpenseStatus::Approved => "Approved",
            ExpenseStatus::Rejected => "Rejected",
        }
    }
}

impl Serialize for ExpenseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ExpenseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match CodeOrName::deserialize(deserializer)? {
            CodeOrName::Code(code) => ExpenseStatus::from_code(code),
            CodeOrName::Name(name) => ExpenseStatus::parse(&name),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

// ============================================================================
// USERS & AUTH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub expires_in: Option<String>,
}

impl LoginResponse {
    pub fn user(&self) -> User {
        User {
            user_id: self.user_id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

// ============================================================================
// EXPENSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "timefmt::lenient_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub id: Uuid,
    pub creator_id: Uuid,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub status: ExpenseStatus,
    #[serde(with = "timefmt::lenient")]
    pub expense_date: DateTime<Utc>,
    #[serde(with = "timefmt::lenient")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timefmt::lenient_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timefmt::lenient_opt")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timefmt::lenient_opt")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processed_by: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub attachment_urls: Vec<String>,
}

impl ExpenseRequest {
    /// Over the receipt threshold with nothing attached yet.
    pub fn needs_receipt(&self) -> bool {
        self.amount > RECEIPT_THRESHOLD && self.attachment_urls.is_empty()
    }

    /// Only drafts can be edited, submitted, deleted or given receipts.
    pub fn is_draft(&self) -> bool {
        self.status == ExpenseStatus::Draft
    }

    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Uncategorized")
    }

    pub fn creator_display(&self) -> String {
        match &self.creator_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.creator_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size as u64) as u32
    }
}

/// List filters, sent to the backend as query-string parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseQuery {
    pub search: Option<String>,
    pub status: Option<ExpenseStatus>,
    pub category_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDir>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ExpenseQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.code().to_string()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }
        if let Some(from) = self.from_date {
            pairs.push(("fromDate", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("toDate", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(min) = self.min_amount {
            pairs.push(("minAmount", min.to_string()));
        }
        if let Some(max) = self.max_amount {
            pairs.push(("maxAmount", max.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sortBy", sort_by.to_string()));
        }
        if let Some(dir) = self.sort_dir {
            pairs.push(("sortDir", dir.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize", size.to_string()));
        }

        pairs
    }

    /// URL-encoded, without the leading `?`. Empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_pairs())
    }
}

pub(crate) fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub expense_request_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    #[serde(default)]
    pub previous_status: Option<ExpenseStatus>,
    #[serde(default)]
    pub new_status: Option<ExpenseStatus>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(with = "timefmt::lenient")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseComment {
    pub id: Uuid,
    pub expense_request_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub text: String,
    #[serde(with = "timefmt::lenient")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub title: String,
    pub description: String,
    pub amount: f64,
    #[serde(with = "timefmt::lenient")]
    pub expense_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub title: String,
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

impl From<&ExpenseRequest> for UpdateExpenseRequest {
    fn from(expense: &ExpenseRequest) -> Self {
        Self {
            title: expense.title.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            category_id: expense.category_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectExpenseRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttachmentRequest {
    pub attachment_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkApproveRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkApproveResult {
    #[serde(default)]
    pub approved: Vec<Uuid>,
    #[serde(default)]
    pub failed: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: Uuid,
}

/// Error payload; any subset of the fields may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl ApiErrorBody {
    /// First non-empty of `error`, `message`, then `errors` joined.
    pub fn message(&self) -> Option<String> {
        if let Some(error) = self.error.as_deref().filter(|s| !s.is_empty()) {
            return Some(error.to_string());
        }
        if let Some(message) = self.message.as_deref().filter(|s| !s.is_empty()) {
            return Some(message.to_string());
        }
        match &self.errors {
            Some(errors) if !errors.is_empty() => Some(errors.join(", ")),
            _ => None,
        }
    }
}

// ============================================================================
// ANALYTICS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAnalytics {
    pub total_expenses: f64,
    pub approved_amount: f64,
    pub pending_amount: f64,
    pub total_count: u64,
    pub approved_count: u64,
    pub pending_count: u64,
    pub rejected_count: u64,
    pub average_expense: f64,
    #[serde(default)]
    pub category_breakdown: Vec<CategorySpending>,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub category_name: String,
    #[serde(default)]
    pub category_icon: String,
    #[serde(default)]
    pub category_color: String,
    pub total_amount: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub total_amount: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub status: String,
    pub count: u64,
    pub total_amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRateData {
    pub period: String,
    pub total_submitted: u64,
    pub approved: u64,
    pub rejected: u64,
    pub approval_rate: f64,
    pub rejection_rate: f64,
}

// ============================================================================
// BUDGETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(with = "timefmt::lenient")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timefmt::lenient")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    pub is_active: bool,
    #[serde(default, with = "timefmt::lenient_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timefmt::lenient_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget_id: Uuid,
    pub budget_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub budget_amount: f64,
    pub spent_amount: f64,
    pub remaining_amount: f64,
    pub percentage_used: f64,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_icon: Option<String>,
    #[serde(with = "timefmt::lenient")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timefmt::lenient")]
    pub end_date: DateTime<Utc>,
    pub days_remaining: i64,
    pub is_over_budget: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expense_json(amount: f64, attachments: Vec<&str>) -> serde_json::Value {
        json!({
            "id": "6f1c1c62-3f1e-4a53-9d6a-0d6a0f0f0a01",
            "creatorId": "6f1c1c62-3f1e-4a53-9d6a-0d6a0f0f0a02",
            "title": "Team lunch",
            "description": "Quarterly offsite",
            "amount": amount,
            "status": "Draft",
            "expenseDate": "2024-03-01T00:00:00",
            "createdAt": "2024-03-02T10:15:00Z",
            "attachmentUrls": attachments,
        })
    }

    #[test]
    fn test_status_decodes_from_name_and_code() {
        let from_name: ExpenseStatus = serde_json::from_value(json!("Approved")).unwrap();
        let from_code: ExpenseStatus = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(from_name, ExpenseStatus::Approved);
        assert_eq!(from_code, ExpenseStatus::Rejected);
    }

    #[test]
    fn test_unknown_status_falls_back_to_draft() {
        let status: ExpenseStatus = serde_json::from_value(json!("Archived")).unwrap();
        assert_eq!(status, ExpenseStatus::Draft);
        assert_eq!(ExpenseStatus::from_code(42), ExpenseStatus::Draft);
    }

    #[test]
    fn test_unknown_role_falls_back_to_employee() {
        let role: UserRole = serde_json::from_value(json!("Auditor")).unwrap();
        assert_eq!(role, UserRole::Employee);
        let role: UserRole = serde_json::from_value(json!("Admin")).unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_role_serializes_as_code() {
        assert_eq!(serde_json::to_value(UserRole::Manager).unwrap(), json!(1));
    }

    #[test]
    fn test_expense_decodes_with_missing_optionals() {
        let expense: ExpenseRequest = serde_json::from_value(expense_json(42.5, vec![])).unwrap();
        assert_eq!(expense.title, "Team lunch");
        assert_eq!(expense.status, ExpenseStatus::Draft);
        assert!(expense.submitted_at.is_none());
        assert_eq!(expense.category_name(), "Uncategorized");
        assert_eq!(expense.creator_display(), "6f1c1c62-3f1e-4a53-9d6a-0d6a0f0f0a02");
    }

    #[test]
    fn test_needs_receipt() {
        let over: ExpenseRequest = serde_json::from_value(expense_json(150.0, vec![])).unwrap();
        let attached: ExpenseRequest =
            serde_json::from_value(expense_json(150.0, vec!["/receipts/a.png"])).unwrap();
        let exactly: ExpenseRequest = serde_json::from_value(expense_json(100.0, vec![])).unwrap();

        assert!(over.needs_receipt());
        assert!(!attached.needs_receipt());
        assert!(!exactly.needs_receipt());
    }

    #[test]
    fn test_query_string_omits_empty_fields() {
        let query = ExpenseQuery {
            search: Some(String::new()),
            page: Some(2),
            page_size: Some(12),
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "page=2&pageSize=12");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let query = ExpenseQuery {
            search: Some("taxi & hotel".to_string()),
            status: Some(ExpenseStatus::Submitted),
            from_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            min_amount: Some(100.0),
            max_amount: Some(250.5),
            sort_by: Some("amount".to_string()),
            sort_dir: Some(SortDir::Asc),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string(),
            "search=taxi%20%26%20hotel&status=1&fromDate=2024-01-31&minAmount=100&maxAmount=250.5&sortBy=amount&sortDir=asc"
        );
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: PagedResult<u8> = PagedResult {
            items: vec![],
            total_count: 25,
            page: 1,
            page_size: 12,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_api_error_message_precedence() {
        let body: ApiErrorBody =
            serde_json::from_value(json!({"message": "m", "errors": ["a", "b"]})).unwrap();
        assert_eq!(body.message().as_deref(), Some("m"));

        let body: ApiErrorBody = serde_json::from_value(json!({"errors": ["a", "b"]})).unwrap();
        assert_eq!(body.message().as_deref(), Some("a, b"));

        let body: ApiErrorBody = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(body.message().as_deref(), Some("boom"));

        assert!(ApiErrorBody::default().message().is_none());
    }

    #[test]
    fn test_create_budget_serializes_plain_dates() {
        let request = CreateBudgetRequest {
            name: "Travel".to_string(),
            description: None,
            amount: 500.0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            category_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["startDate"], json!("2024-01-01"));
        assert!(value.get("description").is_none());
    }
}
