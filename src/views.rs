//! Page state shared by the CLI and the TUI: navigation, filters, paging,
//! bulk selection and form parsing. Nothing here talks to the network.

use chrono::{Local, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::models::{
    CreateBudgetRequest, CreateExpenseRequest, ExpenseQuery, ExpenseRequest, ExpenseStatus,
    SortDir, UpdateBudgetRequest, UpdateExpenseRequest, UserRole, RECEIPT_THRESHOLD,
};

/// Cards per page on My Expenses.
pub const MY_EXPENSES_PAGE_SIZE: u32 = 12;
/// Rows per page on Approvals.
pub const APPROVALS_PAGE_SIZE: u32 = 10;

// ============================================================================
// NAVIGATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    MyExpenses,
    Approvals,
    Budgets,
    Dashboard,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::MyExpenses, Page::Approvals, Page::Budgets, Page::Dashboard];

    pub fn title(&self) -> &'static str {
        match self {
            Page::MyExpenses => "My Expenses",
            Page::Approvals => "Approvals",
            Page::Budgets => "Budgets",
            Page::Dashboard => "Dashboard",
        }
    }

    /// Approvals is reserved for managers and admins.
    pub fn visible_to(&self, role: UserRole) -> bool {
        match self {
            Page::Approvals => matches!(role, UserRole::Manager | UserRole::Admin),
            _ => true,
        }
    }

    pub fn visible_pages(role: UserRole) -> Vec<Page> {
        Page::ALL.into_iter().filter(|p| p.visible_to(role)).collect()
    }

    /// Next page the role may see, wrapping around.
    pub fn next(&self, role: UserRole) -> Self {
        let pages = Page::visible_pages(role);
        let idx = pages.iter().position(|p| p == self).unwrap_or(0);
        pages[(idx + 1) % pages.len()]
    }

    pub fn previous(&self, role: UserRole) -> Self {
        let pages = Page::visible_pages(role);
        let idx = pages.iter().position(|p| p == self).unwrap_or(0);
        pages[(idx + pages.len() - 1) % pages.len()]
    }
}

/// What the My Expenses page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Create,
    Edit,
    View,
    Audit,
}

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    pub label: &'static str,
    pub field: &'static str,
    pub dir: SortDir,
}

pub const MY_EXPENSES_SORTS: [SortOption; 6] = [
    SortOption { label: "Newest First", field: "createdAt", dir: SortDir::Desc },
    SortOption { label: "Oldest First", field: "createdAt", dir: SortDir::Asc },
    SortOption { label: "Highest Amount", field: "amount", dir: SortDir::Desc },
    SortOption { label: "Lowest Amount", field: "amount", dir: SortDir::Asc },
    SortOption { label: "Recent Expense Date", field: "expenseDate", dir: SortDir::Desc },
    SortOption { label: "Oldest Expense Date", field: "expenseDate", dir: SortDir::Asc },
];

pub const APPROVALS_SORTS: [SortOption; 6] = [
    SortOption { label: "Oldest First", field: "submittedAt", dir: SortDir::Asc },
    SortOption { label: "Newest First", field: "submittedAt", dir: SortDir::Desc },
    SortOption { label: "Highest Amount", field: "amount", dir: SortDir::Desc },
    SortOption { label: "Lowest Amount", field: "amount", dir: SortDir::Asc },
    SortOption { label: "Recent Expense Date", field: "expenseDate", dir: SortDir::Desc },
    SortOption { label: "Oldest Expense Date", field: "expenseDate", dir: SortDir::Asc },
];

/// Look a preset up by `field-dir`, e.g. `amount-desc`.
pub fn find_sort(options: &[SortOption], key: &str) -> Option<SortOption> {
    options
        .iter()
        .find(|opt| format!("{}-{}", opt.field, opt.dir.as_str()) == key)
        .copied()
}

// ============================================================================
// FILTERS & PAGING
// ============================================================================

/// Raw filter inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilters {
    pub search: String,
    pub status: Option<ExpenseStatus>,
    pub category_id: Option<Uuid>,
    pub from_date: String,
    pub to_date: String,
    pub min_amount: String,
    pub max_amount: String,
}

impl ExpenseFilters {
    /// Blank inputs are left out; so are amounts and dates that don't parse.
    pub fn to_query(&self, sort: SortOption, pager: &Pager) -> ExpenseQuery {
        ExpenseQuery {
            search: non_blank(&self.search),
            status: self.status,
            category_id: self.category_id,
            from_date: parse_date(&self.from_date),
            to_date: parse_date(&self.to_date),
            min_amount: parse_amount(&self.min_amount),
            max_amount: parse_amount(&self.max_amount),
            sort_by: Some(sort.field.to_string()),
            sort_dir: Some(sort.dir),
            page: Some(pager.page),
            page_size: Some(pager.page_size),
        }
    }

    pub fn is_filtered(&self) -> bool {
        *self != ExpenseFilters::default()
    }

    pub fn clear(&mut self) {
        *self = ExpenseFilters::default();
    }

    /// Cycle All → Draft → Submitted → Approved → Rejected → All.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(ExpenseStatus::Draft),
            Some(ExpenseStatus::Draft) => Some(ExpenseStatus::Submitted),
            Some(ExpenseStatus::Submitted) => Some(ExpenseStatus::Approved),
            Some(ExpenseStatus::Approved) => Some(ExpenseStatus::Rejected),
            Some(ExpenseStatus::Rejected) => None,
        };
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_amount(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            total_count: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size as u64) as u32
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Back to page 1, e.g. after a new search.
    pub fn reset(&mut self) {
        self.page = 1;
    }
}

// ============================================================================
// BULK SELECTION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<Uuid>,
}

impl Selection {
    pub fn toggle(&mut self, id: Uuid) {
        if let Some(pos) = self.ids.iter().position(|x| *x == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Everything on the page selected → clear; otherwise select the page.
    pub fn toggle_all(&mut self, page_ids: &[Uuid]) {
        if !page_ids.is_empty() && self.ids.len() == page_ids.len() {
            self.ids.clear();
        } else {
            self.ids = page_ids.to_vec();
        }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

// ============================================================================
// FORMS
// ============================================================================

/// Expense create/edit inputs as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    pub title: String,
    pub description: String,
    pub amount: String,
    /// `YYYY-MM-DD`; blank means today
    pub expense_date: String,
    pub category_id: Option<Uuid>,
}

impl ExpenseForm {
    /// Pre-filled for editing an existing draft.
    pub fn from_expense(expense: &ExpenseRequest) -> Self {
        Self {
            title: expense.title.clone(),
            description: expense.description.clone(),
            amount: expense.amount.to_string(),
            expense_date: expense.expense_date.format("%Y-%m-%d").to_string(),
            category_id: expense.category_id,
        }
    }

    fn parsed_amount(&self) -> Result<f64> {
        match parse_amount(&self.amount) {
            Some(amount) if amount > 0.0 => Ok(amount),
            _ => Err(ClientError::invalid("Amount must be a positive number")),
        }
    }

    fn parsed_title(&self) -> Result<String> {
        non_blank(&self.title).ok_or_else(|| ClientError::invalid("Title is required"))
    }

    pub fn to_create(&self, today: NaiveDate) -> Result<CreateExpenseRequest> {
        let title = self.parsed_title()?;
        let amount = self.parsed_amount()?;
        let date = if self.expense_date.trim().is_empty() {
            today
        } else {
            parse_date(&self.expense_date)
                .ok_or_else(|| ClientError::invalid("Expense date must be YYYY-MM-DD"))?
        };

        Ok(CreateExpenseRequest {
            title,
            description: self.description.trim().to_string(),
            amount,
            expense_date: date.and_time(NaiveTime::default()).and_utc(),
            category_id: self.category_id,
        })
    }

    pub fn to_update(&self) -> Result<UpdateExpenseRequest> {
        Ok(UpdateExpenseRequest {
            title: self.parsed_title()?,
            description: self.description.trim().to_string(),
            amount: self.parsed_amount()?,
            category_id: self.category_id,
        })
    }

    /// Shown while typing an amount over the receipt threshold.
    pub fn receipt_warning(&self) -> Option<String> {
        match parse_amount(&self.amount) {
            Some(amount) if amount > RECEIPT_THRESHOLD => Some(format!(
                "Expenses over ${:.0} require a receipt attachment before submission",
                RECEIPT_THRESHOLD
            )),
            _ => None,
        }
    }
}

/// Today's date in the user's timezone, for form defaults.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetForm {
    pub name: String,
    pub description: String,
    pub amount: String,
    pub start_date: String,
    pub end_date: String,
    pub category_id: Option<Uuid>,
}

impl BudgetForm {
    fn validated(&self) -> Result<(String, Option<String>, f64, NaiveDate, NaiveDate)> {
        let name = non_blank(&self.name).ok_or_else(|| ClientError::invalid("Name is required"))?;
        let amount = match parse_amount(&self.amount) {
            Some(amount) if amount > 0.0 => amount,
            _ => return Err(ClientError::invalid("Amount must be a positive number")),
        };
        let start = parse_date(&self.start_date)
            .ok_or_else(|| ClientError::invalid("Start date must be YYYY-MM-DD"))?;
        let end = parse_date(&self.end_date)
            .ok_or_else(|| ClientError::invalid("End date must be YYYY-MM-DD"))?;
        if end < start {
            return Err(ClientError::invalid("End date must not be before start date"));
        }
        Ok((name, non_blank(&self.description), amount, start, end))
    }

    pub fn to_create(&self) -> Result<CreateBudgetRequest> {
        let (name, description, amount, start_date, end_date) = self.validated()?;
        Ok(CreateBudgetRequest {
            name,
            description,
            amount,
            start_date,
            end_date,
            category_id: self.category_id,
        })
    }

    pub fn to_update(&self) -> Result<UpdateBudgetRequest> {
        let (name, description, amount, start_date, end_date) = self.validated()?;
        Ok(UpdateBudgetRequest {
            name,
            description,
            amount,
            start_date,
            end_date,
        })
    }
}

pub fn validate_reason(reason: &str) -> Result<String> {
    non_blank(reason).ok_or_else(|| ClientError::invalid("Please provide a rejection reason"))
}

pub fn validate_comment(text: &str) -> Result<String> {
    non_blank(text).ok_or_else(|| ClientError::invalid("Comment cannot be empty"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle_for_employee_skips_approvals() {
        let role = UserRole::Employee;
        assert_eq!(Page::MyExpenses.next(role), Page::Budgets);
        assert_eq!(Page::Dashboard.next(role), Page::MyExpenses);
        assert_eq!(Page::MyExpenses.previous(role), Page::Dashboard);
        assert!(!Page::Approvals.visible_to(role));
    }

    #[test]
    fn test_page_cycle_for_manager() {
        let role = UserRole::Manager;
        assert_eq!(Page::MyExpenses.next(role), Page::Approvals);
        assert_eq!(Page::Approvals.previous(role), Page::MyExpenses);
        assert_eq!(Page::visible_pages(UserRole::Admin).len(), 4);
    }

    #[test]
    fn test_find_sort() {
        let opt = find_sort(&MY_EXPENSES_SORTS, "amount-desc").unwrap();
        assert_eq!(opt.label, "Highest Amount");
        assert!(find_sort(&APPROVALS_SORTS, "title-asc").is_none());
    }

    #[test]
    fn test_filters_to_query() {
        let filters = ExpenseFilters {
            search: "  hotel ".to_string(),
            status: Some(ExpenseStatus::Submitted),
            min_amount: "50".to_string(),
            max_amount: "abc".to_string(),
            from_date: "2024-01-01".to_string(),
            to_date: "01/31/2024".to_string(),
            ..Default::default()
        };
        let pager = Pager::new(APPROVALS_PAGE_SIZE);
        let query = filters.to_query(APPROVALS_SORTS[0], &pager);

        assert_eq!(query.search.as_deref(), Some("hotel"));
        assert_eq!(query.min_amount, Some(50.0));
        assert_eq!(query.max_amount, None);
        assert_eq!(query.from_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(query.to_date, None);
        assert_eq!(query.sort_by.as_deref(), Some("submittedAt"));
        assert_eq!(query.sort_dir, Some(SortDir::Asc));
        assert_eq!(query.page, Some(1));
        assert_eq!(query.page_size, Some(10));
    }

    #[test]
    fn test_status_cycle_wraps() {
        let mut filters = ExpenseFilters::default();
        for _ in 0..5 {
            filters.cycle_status();
        }
        assert_eq!(filters.status, None);
        filters.cycle_status();
        assert_eq!(filters.status, Some(ExpenseStatus::Draft));
        assert!(filters.is_filtered());
        filters.clear();
        assert!(!filters.is_filtered());
    }

    #[test]
    fn test_pager_bounds() {
        let mut pager = Pager::new(MY_EXPENSES_PAGE_SIZE);
        pager.total_count = 25;
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.previous());
        assert!(pager.next());
        assert!(pager.next());
        assert!(!pager.next());
        assert_eq!(pager.page, 3);
        pager.reset();
        assert_eq!(pager.page, 1);
    }

    #[test]
    fn test_pager_empty() {
        let pager = Pager::new(10);
        assert_eq!(pager.total_pages(), 0);
        assert!(!pager.has_next());
    }

    #[test]
    fn test_selection_toggle() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut sel = Selection::default();
        sel.toggle(a);
        sel.toggle(b);
        sel.toggle(a);
        assert_eq!(sel.ids(), &[b]);
    }

    #[test]
    fn test_selection_toggle_all() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let mut sel = Selection::default();
        sel.toggle(ids[0]);

        sel.toggle_all(&ids);
        assert_eq!(sel.len(), 2);

        sel.toggle_all(&ids);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_expense_form_create() {
        let form = ExpenseForm {
            title: "Office Supplies".to_string(),
            description: " Paper ".to_string(),
            amount: "42.10".to_string(),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let request = form.to_create(today).unwrap();

        assert_eq!(request.description, "Paper");
        assert_eq!(request.amount, 42.10);
        assert_eq!(request.expense_date.format("%Y-%m-%d").to_string(), "2024-04-02");
        assert!(form.receipt_warning().is_none());
    }

    #[test]
    fn test_expense_form_rejects_bad_input() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let mut form = ExpenseForm {
            title: "  ".to_string(),
            amount: "10".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_create(today).unwrap_err().user_message(), "Title is required");

        form.title = "Taxi".to_string();
        form.amount = "-3".to_string();
        assert!(form.to_update().is_err());

        form.amount = "3".to_string();
        form.expense_date = "tomorrow".to_string();
        assert!(form.to_create(today).is_err());
    }

    #[test]
    fn test_receipt_warning_over_threshold() {
        let form = ExpenseForm {
            amount: "100.01".to_string(),
            ..Default::default()
        };
        assert!(form.receipt_warning().unwrap().contains("$100"));
    }

    #[test]
    fn test_budget_form_date_order() {
        let mut form = BudgetForm {
            name: "Q1 Travel".to_string(),
            amount: "1500".to_string(),
            start_date: "2024-03-31".to_string(),
            end_date: "2024-01-01".to_string(),
            ..Default::default()
        };
        assert!(form.to_create().is_err());

        form.end_date = "2024-06-30".to_string();
        let request = form.to_create().unwrap();
        assert_eq!(request.description, None);
        assert_eq!(request.amount, 1500.0);
        assert_eq!(form.to_update().unwrap().name, "Q1 Travel");
    }

    #[test]
    fn test_reason_and_comment_validation() {
        assert!(validate_reason("   ").is_err());
        assert_eq!(validate_reason(" duplicate ").unwrap(), "duplicate");
        assert_eq!(
            validate_comment("").unwrap_err().user_message(),
            "Comment cannot be empty"
        );
    }
}
