use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

use expense_desk::dashboard::{category_share, format_money, text_bar, trend_widths, BudgetHealth};
use expense_desk::timefmt::{format_date, format_datetime, format_short};
use expense_desk::views::{
    today, validate_comment, validate_reason, APPROVALS_PAGE_SIZE, APPROVALS_SORTS,
    MY_EXPENSES_PAGE_SIZE, MY_EXPENSES_SORTS,
};
use expense_desk::{
    export_expenses_csv, AuditLog, BudgetStatus, ClientError, ExpenseAnalytics, ExpenseComment,
    ExpenseFilters, ExpenseForm, ExpenseRequest, ExpenseStatus, Level, Notifications, Page, Pager,
    Selection, Session, ThemePreference, UserRole, ViewMode,
};

const TICK: Duration = Duration::from_millis(250);

// ============================================================================
// THEME
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_theme(theme: ThemePreference) -> Self {
        if theme.dark {
            Self {
                background: Color::Black,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                border: Color::Cyan,
                highlight: Color::DarkGray,
                success: Color::Green,
                warning: Color::Yellow,
                danger: Color::Red,
            }
        } else {
            Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                border: Color::Blue,
                highlight: Color::LightBlue,
                success: Color::Green,
                warning: Color::Magenta,
                danger: Color::Red,
            }
        }
    }

    fn status(&self, status: ExpenseStatus) -> Color {
        match status {
            ExpenseStatus::Draft => self.muted,
            ExpenseStatus::Submitted => self.warning,
            ExpenseStatus::Approved => self.success,
            ExpenseStatus::Rejected => self.danger,
        }
    }
}

// ============================================================================
// PROMPTS
// ============================================================================

/// Field being typed in the expense form; edits skip the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Amount,
    Description,
    Date,
}

impl FormField {
    fn next(&self, editing: bool) -> Option<Self> {
        match self {
            FormField::Title => Some(FormField::Amount),
            FormField::Amount => Some(FormField::Description),
            FormField::Description if editing => None,
            FormField::Description => Some(FormField::Date),
            FormField::Date => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Amount => "Amount",
            FormField::Description => "Description",
            FormField::Date => "Expense date (YYYY-MM-DD, blank for today)",
        }
    }

    fn value<'a>(&self, form: &'a ExpenseForm) -> &'a str {
        match self {
            FormField::Title => &form.title,
            FormField::Amount => &form.amount,
            FormField::Description => &form.description,
            FormField::Date => &form.expense_date,
        }
    }

    fn store(&self, form: &mut ExpenseForm, value: String) {
        match self {
            FormField::Title => form.title = value,
            FormField::Amount => form.amount = value,
            FormField::Description => form.description = value,
            FormField::Date => form.expense_date = value,
        }
    }
}

/// Actions that wait for a y/n answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    Delete(Uuid),
    Approve(Uuid),
    BulkApprove(Vec<Uuid>),
    BulkReject(Vec<Uuid>, String),
}

impl Pending {
    fn question(&self) -> String {
        match self {
            Pending::Delete(_) => "Are you sure you want to delete this expense?".to_string(),
            Pending::Approve(_) => "Are you sure you want to approve this expense?".to_string(),
            Pending::BulkApprove(ids) => format!("Approve {} selected expenses?", ids.len()),
            Pending::BulkReject(ids, _) => format!("Reject {} selected expenses?", ids.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Search,
    Reject(Vec<Uuid>),
    Comment(Uuid),
    Upload(Uuid),
    Expense {
        editing: Option<Uuid>,
        form: ExpenseForm,
        field: FormField,
    },
    Confirm(Pending),
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    session: Session,
    pub current_page: Page,
    pub view_mode: ViewMode,
    pub state: TableState,
    pub expenses: Vec<ExpenseRequest>,
    pub expense_pager: Pager,
    pub expense_filters: ExpenseFilters,
    pub expense_sort: usize,
    pub pending: Vec<ExpenseRequest>,
    pub approval_pager: Pager,
    pub approval_filters: ExpenseFilters,
    pub approval_sort: usize,
    pub selection: Selection,
    pub budgets: Vec<BudgetStatus>,
    pub analytics: ExpenseAnalytics,
    pub audit: Vec<AuditLog>,
    pub comments: Vec<ExpenseComment>,
    pub prompt: Option<Prompt>,
    pub input: String,
    pub notifications: Notifications,
    pub theme: ThemePreference,
    pub export_dir: PathBuf,
    pub session_expired: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, theme: ThemePreference, export_dir: PathBuf) -> Self {
        Self {
            session,
            current_page: Page::MyExpenses,
            view_mode: ViewMode::List,
            state: TableState::default(),
            expenses: Vec::new(),
            expense_pager: Pager::new(MY_EXPENSES_PAGE_SIZE),
            expense_filters: ExpenseFilters::default(),
            expense_sort: 0,
            pending: Vec::new(),
            approval_pager: Pager::new(APPROVALS_PAGE_SIZE),
            approval_filters: ExpenseFilters::default(),
            approval_sort: 0,
            selection: Selection::default(),
            budgets: Vec::new(),
            analytics: ExpenseAnalytics::default(),
            audit: Vec::new(),
            comments: Vec::new(),
            prompt: None,
            input: String::new(),
            notifications: Notifications::new(),
            theme,
            export_dir,
            session_expired: false,
            should_quit: false,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }

    fn role(&self) -> UserRole {
        self.session
            .user()
            .map(|user| user.role)
            .unwrap_or(UserRole::Employee)
    }

    /// Unwrap a backend result. A 401 ends the TUI; anything else becomes
    /// an error notice.
    fn handle<T>(&mut self, result: Result<T, ClientError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if err.is_unauthorized() => {
                self.session.expire();
                self.session_expired = true;
                self.should_quit = true;
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                self.notifications.from_error(&err);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    pub fn reload(&mut self) {
        match self.current_page {
            Page::MyExpenses => self.reload_expenses(),
            Page::Approvals => self.reload_pending(),
            Page::Budgets => self.reload_budgets(),
            Page::Dashboard => self.reload_dashboard(),
        }
    }

    fn reload_expenses(&mut self) {
        let sort = MY_EXPENSES_SORTS[self.expense_sort];
        let query = self.expense_filters.to_query(sort, &self.expense_pager);
        let result = self.session.client().my_expenses(&query);

        if let Some(page) = self.handle(result) {
            self.expense_pager.total_count = page.total_count;
            if page.items.is_empty() && self.expense_pager.previous() {
                return self.reload_expenses();
            }
            self.expenses = page.items;
            self.reset_cursor();
        }
    }

    fn reload_pending(&mut self) {
        let sort = APPROVALS_SORTS[self.approval_sort];
        let query = self.approval_filters.to_query(sort, &self.approval_pager);
        let result = self.session.client().pending_expenses(&query);

        if let Some(page) = self.handle(result) {
            self.approval_pager.total_count = page.total_count;
            if page.items.is_empty() && self.approval_pager.previous() {
                return self.reload_pending();
            }
            self.pending = page.items;
            self.selection.clear();
            self.reset_cursor();
        }
    }

    fn reload_budgets(&mut self) {
        let result = self.session.client().budget_status();
        if let Some(budgets) = self.handle(result) {
            self.budgets = budgets;
            self.reset_cursor();
        }
    }

    fn reload_dashboard(&mut self) {
        let result = self.session.client().my_analytics(None, None);
        if let Some(analytics) = self.handle(result) {
            self.analytics = analytics;
        }
        self.reload_budgets();
    }

    fn refresh_detail(&mut self) {
        let Some(id) = self.selected_expense().map(|e| e.id) else {
            self.comments.clear();
            self.audit.clear();
            return;
        };

        match self.view_mode {
            ViewMode::View => {
                let result = self.session.client().comments(id);
                self.comments = self.handle(result).unwrap_or_default();
            }
            ViewMode::Audit => {
                let result = self.session.client().audit_history(id);
                self.audit = self.handle(result).unwrap_or_default();
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn row_count(&self) -> usize {
        match self.current_page {
            Page::MyExpenses => self.expenses.len(),
            Page::Approvals => self.pending.len(),
            Page::Budgets => self.budgets.len(),
            Page::Dashboard => 0,
        }
    }

    fn reset_cursor(&mut self) {
        let selected = if self.row_count() > 0 { Some(0) } else { None };
        self.state.select(selected);
    }

    pub fn selected_expense(&self) -> Option<&ExpenseRequest> {
        let rows = match self.current_page {
            Page::MyExpenses => &self.expenses,
            Page::Approvals => &self.pending,
            _ => return None,
        };
        self.state.selected().and_then(|i| rows.get(i))
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn switch_page(&mut self, page: Page) {
        self.current_page = page;
        self.view_mode = ViewMode::List;
        self.selection.clear();
        self.state.select(None);
        self.reload();
    }

    fn pager_mut(&mut self) -> Option<&mut Pager> {
        match self.current_page {
            Page::MyExpenses => Some(&mut self.expense_pager),
            Page::Approvals => Some(&mut self.approval_pager),
            _ => None,
        }
    }

    fn filters_mut(&mut self) -> Option<&mut ExpenseFilters> {
        match self.current_page {
            Page::MyExpenses => Some(&mut self.expense_filters),
            Page::Approvals => Some(&mut self.approval_filters),
            _ => None,
        }
    }

    fn next_server_page(&mut self) {
        if self.pager_mut().map(|p| p.next()).unwrap_or(false) {
            self.reload();
        }
    }

    fn previous_server_page(&mut self) {
        if self.pager_mut().map(|p| p.previous()).unwrap_or(false) {
            self.reload();
        }
    }

    /// Filters changed: back to page 1 and fetch again.
    fn refilter(&mut self) {
        if let Some(pager) = self.pager_mut() {
            pager.reset();
        }
        self.reload();
    }

    fn cycle_sort(&mut self) {
        match self.current_page {
            Page::MyExpenses => self.expense_sort = (self.expense_sort + 1) % MY_EXPENSES_SORTS.len(),
            Page::Approvals => self.approval_sort = (self.approval_sort + 1) % APPROVALS_SORTS.len(),
            _ => return,
        }
        self.refilter();
    }

    fn sort_label(&self) -> &'static str {
        match self.current_page {
            Page::Approvals => APPROVALS_SORTS[self.approval_sort].label,
            _ => MY_EXPENSES_SORTS[self.expense_sort].label,
        }
    }

    fn toggle_view(&mut self, mode: ViewMode) {
        if self.selected_expense().is_none() {
            return;
        }
        self.view_mode = if self.view_mode == mode { ViewMode::List } else { mode };
        self.refresh_detail();
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.on_prompt_key(key);
            return;
        }

        let role = self.role();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.view_mode == ViewMode::List {
                    self.should_quit = true;
                } else {
                    self.view_mode = ViewMode::List;
                }
            }
            KeyCode::BackTab => self.switch_page(self.current_page.previous(role)),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.switch_page(self.current_page.previous(role));
                } else {
                    self.switch_page(self.current_page.next(role));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                self.refresh_detail();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                self.refresh_detail();
            }
            KeyCode::Home => {
                if self.row_count() > 0 {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                if self.row_count() > 0 {
                    self.state.select(Some(self.row_count() - 1));
                }
            }
            KeyCode::PageDown | KeyCode::Char(']') => self.next_server_page(),
            KeyCode::PageUp | KeyCode::Char('[') => self.previous_server_page(),
            KeyCode::F(5) => self.reload(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Enter => self.toggle_view(ViewMode::View),
            KeyCode::Char('h') => self.toggle_view(ViewMode::Audit),
            KeyCode::Char('/') if matches!(self.current_page, Page::MyExpenses | Page::Approvals) => {
                self.input = self.expense_filters_for_page().search.clone();
                self.prompt = Some(Prompt::Search);
            }
            KeyCode::Char('f') => {
                if let Some(filters) = self.filters_mut() {
                    filters.cycle_status();
                    self.refilter();
                }
            }
            KeyCode::Char('c') => {
                if let Some(filters) = self.filters_mut() {
                    filters.clear();
                    self.refilter();
                }
            }
            KeyCode::Char('o') => self.cycle_sort(),
            KeyCode::Char('x') => self.export(),
            KeyCode::Char('m') => self.start_comment(),
            _ => match self.current_page {
                Page::MyExpenses => self.on_my_expenses_key(key.code),
                Page::Approvals => self.on_approvals_key(key.code),
                _ => {}
            },
        }
    }

    fn expense_filters_for_page(&self) -> &ExpenseFilters {
        match self.current_page {
            Page::Approvals => &self.approval_filters,
            _ => &self.expense_filters,
        }
    }

    fn on_my_expenses_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('n') => {
                self.view_mode = ViewMode::Create;
                self.input.clear();
                self.prompt = Some(Prompt::Expense {
                    editing: None,
                    form: ExpenseForm::default(),
                    field: FormField::Title,
                });
            }
            KeyCode::Char('e') => {
                let Some(expense) = self.draft_or_notice("edited") else {
                    return;
                };
                let form = ExpenseForm::from_expense(&expense);
                self.input = form.title.clone();
                self.view_mode = ViewMode::Edit;
                self.prompt = Some(Prompt::Expense {
                    editing: Some(expense.id),
                    form,
                    field: FormField::Title,
                });
            }
            KeyCode::Char('s') => {
                let Some(expense) = self.draft_or_notice("submitted") else {
                    return;
                };
                if expense.needs_receipt() {
                    self.notifications
                        .error("Expenses over $100 require a receipt attachment before submission");
                    return;
                }
                let result = self.session.client().submit_expense(expense.id);
                if self.handle(result).is_some() {
                    self.notifications.success("Expense submitted for approval");
                    self.reload_expenses();
                }
            }
            KeyCode::Char('d') => {
                if let Some(expense) = self.draft_or_notice("deleted") {
                    self.prompt = Some(Prompt::Confirm(Pending::Delete(expense.id)));
                }
            }
            KeyCode::Char('u') => {
                if let Some(expense) = self.draft_or_notice("given receipts") {
                    self.input.clear();
                    self.prompt = Some(Prompt::Upload(expense.id));
                }
            }
            _ => {}
        }
    }

    /// The selected expense if it is still a draft, otherwise a notice.
    fn draft_or_notice(&mut self, action: &str) -> Option<ExpenseRequest> {
        let expense = self.selected_expense()?.clone();
        if expense.is_draft() {
            Some(expense)
        } else {
            self.notifications
                .error(format!("Only draft expenses can be {}", action));
            None
        }
    }

    fn on_approvals_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_expense().map(|e| e.id) {
                    self.selection.toggle(id);
                }
            }
            KeyCode::Char('v') => {
                let ids: Vec<Uuid> = self.pending.iter().map(|e| e.id).collect();
                self.selection.toggle_all(&ids);
            }
            KeyCode::Char('a') => {
                if let Some(id) = self.selected_expense().map(|e| e.id) {
                    self.prompt = Some(Prompt::Confirm(Pending::Approve(id)));
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.selected_expense().map(|e| e.id) {
                    self.input.clear();
                    self.prompt = Some(Prompt::Reject(vec![id]));
                }
            }
            KeyCode::Char('A') => {
                if self.selection.is_empty() {
                    self.notifications.error("No expenses selected");
                } else {
                    let ids = self.selection.ids().to_vec();
                    self.prompt = Some(Prompt::Confirm(Pending::BulkApprove(ids)));
                }
            }
            KeyCode::Char('R') => {
                if self.selection.is_empty() {
                    self.notifications.error("No expenses selected");
                } else {
                    self.input.clear();
                    self.prompt = Some(Prompt::Reject(self.selection.ids().to_vec()));
                }
            }
            _ => {}
        }
    }

    fn start_comment(&mut self) {
        let Some(id) = self.selected_expense().map(|e| e.id) else {
            return;
        };
        if !self.session.can_comment() {
            self.notifications
                .error("Only managers and admins can add comments");
            return;
        }
        self.input.clear();
        self.prompt = Some(Prompt::Comment(id));
    }

    fn toggle_theme(&mut self) {
        let result = self.theme.toggle(self.session.store());
        if self.handle(result).is_some() {
            self.notifications
                .success(format!("Switched to {} mode", self.theme.label()));
        }
    }

    fn export(&mut self) {
        let (prefix, rows) = match self.current_page {
            Page::MyExpenses => ("expenses", &self.expenses),
            Page::Approvals => ("pending-approvals", &self.pending),
            _ => return,
        };
        let result = export_expenses_csv(&self.export_dir, prefix, rows);
        if let Some(path) = self.handle(result) {
            self.notifications
                .success(format!("Expenses exported to {}", path.display()));
        }
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    fn on_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };

        if let Prompt::Confirm(action) = prompt {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.run_pending(action);
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                if matches!(prompt, Prompt::Expense { .. }) {
                    self.view_mode = ViewMode::List;
                }
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                self.submit_prompt(prompt, input);
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.prompt = Some(prompt);
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.prompt = Some(prompt);
            }
            _ => self.prompt = Some(prompt),
        }
    }

    fn run_pending(&mut self, action: Pending) {
        match action {
            Pending::Delete(id) => {
                let result = self.session.client().delete_expense(id);
                if self.handle(result).is_some() {
                    self.notifications.success("Expense deleted");
                    self.view_mode = ViewMode::List;
                    self.reload_expenses();
                }
            }
            Pending::Approve(id) => {
                let result = self.session.client().approve_expense(id);
                if self.handle(result).is_some() {
                    self.notifications.success("Expense approved successfully");
                    self.view_mode = ViewMode::List;
                    self.reload_pending();
                }
            }
            Pending::BulkApprove(ids) => {
                let result = self.session.client().bulk_approve(&ids);
                if let Some(outcome) = self.handle(result) {
                    self.notifications
                        .success(format!("Approved {} expenses.", outcome.approved.len()));
                    if !outcome.failed.is_empty() {
                        self.notifications
                            .error(format!("Could not approve {} expenses", outcome.failed.len()));
                    }
                    self.reload_pending();
                }
            }
            Pending::BulkReject(ids, reason) => {
                let result = self.session.client().bulk_reject(&ids, &reason);
                if let Some(count) = self.handle(result) {
                    self.notifications
                        .success(format!("Rejected {} expenses.", count));
                }
                self.view_mode = ViewMode::List;
                self.reload_pending();
            }
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt, input: String) {
        match prompt {
            Prompt::Search => {
                if let Some(filters) = self.filters_mut() {
                    filters.search = input;
                }
                self.refilter();
            }
            Prompt::Reject(ids) => {
                let reason = match validate_reason(&input) {
                    Ok(reason) => reason,
                    Err(err) => {
                        self.notifications.from_error(&err);
                        self.prompt = Some(Prompt::Reject(ids));
                        return;
                    }
                };

                if ids.len() != 1 {
                    self.prompt = Some(Prompt::Confirm(Pending::BulkReject(ids, reason)));
                    return;
                }
                let result = self.session.client().reject_expense(ids[0], &reason);
                if self.handle(result).is_some() {
                    self.notifications.success("Expense rejected successfully");
                }
                self.view_mode = ViewMode::List;
                self.reload_pending();
            }
            Prompt::Comment(id) => {
                let text = match validate_comment(&input) {
                    Ok(text) => text,
                    Err(err) => {
                        self.notifications.from_error(&err);
                        return;
                    }
                };
                let result = self.session.client().add_comment(id, &text);
                if let Some(comment) = self.handle(result) {
                    self.notifications.success("Comment added successfully");
                    self.comments.push(comment);
                }
            }
            Prompt::Upload(id) => {
                let path = input.trim();
                if path.is_empty() {
                    self.notifications.error("Please choose a file to upload");
                    return;
                }
                let result = self.session.client().upload_receipt(id, Path::new(path));
                if self.handle(result).is_some() {
                    self.notifications.success("Receipt uploaded");
                    self.reload_expenses();
                }
            }
            Prompt::Expense {
                editing,
                mut form,
                field,
            } => {
                field.store(&mut form, input);
                if let Some(next) = field.next(editing.is_some()) {
                    self.input = next.value(&form).to_string();
                    self.prompt = Some(Prompt::Expense {
                        editing,
                        form,
                        field: next,
                    });
                    return;
                }

                self.view_mode = ViewMode::List;
                self.save_expense(editing, &form);
            }
            Prompt::Confirm(action) => self.run_pending(action),
        }
    }

    fn save_expense(&mut self, editing: Option<Uuid>, form: &ExpenseForm) {
        let client = self.session.client();
        let result = match editing {
            None => form
                .to_create(today())
                .and_then(|request| client.create_expense(&request))
                .map(|_| "Expense created successfully"),
            Some(id) => form
                .to_update()
                .and_then(|request| client.update_expense(id, &request))
                .map(|_| "Expense updated successfully"),
        };

        if let Some(message) = self.handle(result) {
            self.notifications.success(message);
            self.reload_expenses();
        }
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        if app.should_quit {
            return Ok(());
        }

        // Poll so expired notices disappear without a keypress
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let palette = app.palette();
    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        f.size(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar / prompt
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let detail_open = matches!(app.view_mode, ViewMode::View | ViewMode::Audit)
        && matches!(app.current_page, Page::MyExpenses | Page::Approvals);

    if detail_open {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_expense_table(f, content_chunks[0], app);
        if app.view_mode == ViewMode::Audit {
            render_audit_panel(f, content_chunks[1], app);
        } else {
            render_detail_panel(f, content_chunks[1], app);
        }
    } else {
        match app.current_page {
            Page::MyExpenses | Page::Approvals => render_expense_table(f, chunks[1], app),
            Page::Budgets => render_budgets(f, chunks[1], app),
            Page::Dashboard => render_dashboard(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let mut tab_spans = vec![];

    for (i, page) in Page::visible_pages(app.role()).into_iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if page == app.current_page {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.muted)
        };
        tab_spans.push(Span::styled(page.title(), style));
    }

    if let Some(user) = app.session.user() {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("{} ({})", user.full_name, user.role.name()),
            Style::default().fg(palette.text),
        ));
    }
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} mode", app.theme.label()),
        Style::default().fg(palette.muted),
    ));

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );

    f.render_widget(header, area);
}

fn render_expense_table(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.palette();
    let approvals = app.current_page == Page::Approvals;

    let mut titles = vec!["", "Title", "Amount", "Status", "Category", "Date"];
    if approvals {
        titles.push("Submitted By");
    }
    let header_cells = titles.into_iter().map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(palette.highlight))
        .height(1);

    let rows_src = if approvals { &app.pending } else { &app.expenses };
    let rows: Vec<Row> = rows_src
        .iter()
        .map(|expense| {
            let marker = match (approvals, app.selection.contains(&expense.id)) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                _ if expense.needs_receipt() => "⚠",
                _ if !expense.attachment_urls.is_empty() => "📎",
                _ => "",
            };

            let mut cells = vec![
                Cell::from(marker),
                Cell::from(truncate(&expense.title, 30)),
                Cell::from(format!("{:.2}", expense.amount)),
                Cell::from(expense.status.name())
                    .style(Style::default().fg(palette.status(expense.status))),
                Cell::from(truncate(expense.category_name(), 18)),
                Cell::from(format_date(&expense.expense_date)),
            ];
            if approvals {
                cells.push(Cell::from(truncate(&expense.creator_display(), 20)));
            }
            Row::new(cells).height(1)
        })
        .collect();

    let pager = if approvals { app.approval_pager } else { app.expense_pager };
    let filters = app.expense_filters_for_page();
    let mut title = format!(
        " {} · Page {}/{} · {} total · {} ",
        app.current_page.title(),
        pager.page,
        pager.total_pages().max(1),
        pager.total_count,
        app.sort_label()
    );
    if let Some(status) = filters.status {
        title.push_str(&format!("· {} ", status.name()));
    }
    if !filters.search.is_empty() {
        title.push_str(&format!("· \"{}\" ", filters.search));
    }
    if approvals && !app.selection.is_empty() {
        title.push_str(&format!("· {} selected ", app.selection.len()));
    }

    let mut widths = vec![
        Constraint::Length(4),
        Constraint::Length(32),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(20),
        Constraint::Length(12),
    ];
    if approvals {
        widths.push(Constraint::Length(22));
    }

    let empty = rows.is_empty();
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.text))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    if empty {
        let message = if approvals { "No pending expenses" } else { "No expenses found" };
        let inner = Layout::default()
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .margin(1)
            .split(area);
        f.render_stateful_widget(table, area, &mut app.state);
        f.render_widget(
            Paragraph::new(format!("  {}", message)).style(Style::default().fg(palette.muted)),
            inner[1],
        );
    } else {
        f.render_stateful_widget(table, area, &mut app.state);
    }
}

fn label(text: &str, palette: Palette) -> Span<'static> {
    Span::styled(
        format!("  {}: ", text),
        Style::default()
            .fg(palette.border)
            .add_modifier(Modifier::BOLD),
    )
}

fn section(text: &str, palette: Palette) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let Some(expense) = app.selected_expense() else {
        f.render_widget(
            Paragraph::new("No expense selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.accent))
                    .title(" Expense Details "),
            ),
            area,
        );
        return;
    };

    let mut content = vec![
        Line::from(vec![
            label("Title", palette),
            Span::styled(expense.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            label("Status", palette),
            Span::styled(
                expense.status.name(),
                Style::default().fg(palette.status(expense.status)),
            ),
        ]),
        Line::from(vec![
            label("Amount", palette),
            Span::raw(format_money(expense.amount)),
        ]),
        Line::from(vec![
            label("Category", palette),
            Span::raw(expense.category_name().to_string()),
        ]),
        Line::from(vec![
            label("Expense date", palette),
            Span::raw(format_date(&expense.expense_date)),
        ]),
        Line::from(vec![
            label("Created", palette),
            Span::raw(format_datetime(&expense.created_at)),
        ]),
    ];

    if let Some(at) = &expense.submitted_at {
        content.push(Line::from(vec![
            label("Submitted", palette),
            Span::raw(format_datetime(at)),
        ]));
    }
    if let Some(at) = &expense.processed_at {
        content.push(Line::from(vec![
            label("Processed", palette),
            Span::raw(format!(
                "{} by {}",
                format_datetime(at),
                expense.processed_by.as_deref().unwrap_or("-")
            )),
        ]));
    }
    if let Some(reason) = &expense.rejection_reason {
        content.push(Line::from(vec![
            label("Rejection reason", palette),
            Span::styled(reason.clone(), Style::default().fg(palette.danger)),
        ]));
    }
    content.push(Line::from(vec![
        label("Creator", palette),
        Span::raw(expense.creator_display()),
    ]));

    content.push(Line::from(""));
    content.push(section("RECEIPTS", palette));
    if expense.attachment_urls.is_empty() {
        content.push(Line::from("  None attached"));
    }
    for url in &expense.attachment_urls {
        content.push(Line::from(format!("  📎 {}", url)));
    }
    if expense.needs_receipt() {
        content.push(Line::from(Span::styled(
            "  ⚠ Over $100: attach a receipt before submitting",
            Style::default().fg(palette.warning),
        )));
    }

    if !expense.description.is_empty() {
        content.push(Line::from(""));
        content.push(section("DESCRIPTION", palette));
        for line in wrap_text(&expense.description, 40) {
            content.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    content.push(Line::from(""));
    content.push(section("COMMENTS", palette));
    if app.comments.is_empty() {
        content.push(Line::from("  No comments yet"));
    }
    for comment in &app.comments {
        content.push(Line::from(vec![
            Span::styled(
                format!("  {} ", comment.user_name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_short(&comment.created_at),
                Style::default().fg(palette.muted),
            ),
        ]));
        for line in wrap_text(&comment.text, 40) {
            content.push(Line::from(format!("    {}", line)));
        }
    }

    let panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .title(" Expense Details "),
    );

    f.render_widget(panel, area);
}

fn render_audit_panel(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let mut content = Vec::new();

    if app.audit.is_empty() {
        content.push(Line::from("  No audit history"));
    }
    for log in &app.audit {
        let transition = match (log.previous_status, log.new_status) {
            (Some(from), Some(to)) => format!("{} → {}", from.name(), to.name()),
            (None, Some(to)) => to.name().to_string(),
            _ => String::new(),
        };
        content.push(Line::from(vec![
            Span::styled(
                format!("  {} ", format_datetime(&log.timestamp)),
                Style::default().fg(palette.muted),
            ),
            Span::styled(
                log.action.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", transition)),
        ]));
        if let Some(details) = &log.details {
            content.push(Line::from(format!("    {}", details)));
        }
    }

    let panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .title(" Audit History "),
    );
    f.render_widget(panel, area);
}

fn health_color(health: BudgetHealth, palette: Palette) -> Color {
    match health {
        BudgetHealth::Healthy => palette.success,
        BudgetHealth::Warning => palette.warning,
        BudgetHealth::Over => palette.danger,
    }
}

fn render_budgets(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.palette();

    let header_cells = ["Budget", "Usage", "Used", "Spent", "Budget", "Remaining", "Days", "Period"]
        .into_iter()
        .map(|h| {
            Cell::from(h).style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells)
        .style(Style::default().bg(palette.highlight))
        .height(1);

    let rows: Vec<Row> = app
        .budgets
        .iter()
        .map(|status| {
            let color = health_color(BudgetHealth::of(status), palette);
            Row::new(vec![
                Cell::from(truncate(&status.budget_name, 22)),
                Cell::from(text_bar(status.percentage_used, 16)).style(Style::default().fg(color)),
                Cell::from(format!("{:.1}%", status.percentage_used))
                    .style(Style::default().fg(color)),
                Cell::from(format_money(status.spent_amount)),
                Cell::from(format_money(status.budget_amount)),
                Cell::from(format_money(status.remaining_amount)),
                Cell::from(status.days_remaining.to_string()),
                Cell::from(format!(
                    "{} - {}",
                    format_short(&status.start_date),
                    format_short(&status.end_date)
                )),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(28),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.text))
            .title(" Budgets - Active Spending Caps "),
    )
    .highlight_style(
        Style::default()
            .bg(palette.highlight)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let a = &app.analytics;

    let mut content = vec![
        Line::from(""),
        section("SUMMARY", palette),
        Line::from(vec![
            label("Total", palette),
            Span::raw(format!("{} ({} expenses)", format_money(a.total_expenses), a.total_count)),
        ]),
        Line::from(vec![
            label("Approved", palette),
            Span::styled(
                format!("{} ({})", format_money(a.approved_amount), a.approved_count),
                Style::default().fg(palette.success),
            ),
        ]),
        Line::from(vec![
            label("Pending", palette),
            Span::styled(
                format!("{} ({})", format_money(a.pending_amount), a.pending_count),
                Style::default().fg(palette.warning),
            ),
        ]),
        Line::from(vec![
            label("Rejected", palette),
            Span::styled(a.rejected_count.to_string(), Style::default().fg(palette.danger)),
        ]),
        Line::from(vec![
            label("Average", palette),
            Span::raw(format_money(a.average_expense)),
        ]),
        Line::from(""),
        section("BY CATEGORY", palette),
    ];

    if a.category_breakdown.is_empty() {
        content.push(Line::from("  No spending yet"));
    }
    for category in &a.category_breakdown {
        let share = category_share(category, a);
        content.push(Line::from(vec![
            Span::raw(format!("  {:<18} ", truncate(&category.category_name, 18))),
            Span::styled(text_bar(share, 24), Style::default().fg(palette.accent)),
            Span::raw(format!(" {:>5.1}%  {}", share, format_money(category.total_amount))),
        ]));
    }

    content.push(Line::from(""));
    content.push(section("MONTHLY TREND", palette));
    for (trend, width) in a.monthly_trends.iter().zip(trend_widths(&a.monthly_trends)) {
        content.push(Line::from(vec![
            Span::raw(format!("  {:<10} ", format!("{} {}", trend.month_name, trend.year))),
            Span::styled(text_bar(width, 24), Style::default().fg(palette.border)),
            Span::raw(format!("  {}", format_money(trend.total_amount))),
        ]));
    }

    let over: Vec<&BudgetStatus> = app
        .budgets
        .iter()
        .filter(|b| BudgetHealth::of(b) != BudgetHealth::Healthy)
        .collect();
    if !over.is_empty() {
        content.push(Line::from(""));
        content.push(section("BUDGET ALERTS", palette));
        for status in over {
            let health = BudgetHealth::of(status);
            content.push(Line::from(Span::styled(
                format!(
                    "  {}: {:.1}% used ({})",
                    status.budget_name,
                    status.percentage_used,
                    health.label()
                ),
                Style::default().fg(health_color(health, palette)),
            )));
        }
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.text))
            .title(" Dashboard "),
    );
    f.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = match (app.current_page, app.view_mode) {
        (Page::MyExpenses, _) => vec![
            ("n", "New"),
            ("e", "Edit"),
            ("s", "Submit"),
            ("d", "Delete"),
            ("u", "Receipt"),
            ("h", "Audit"),
        ],
        (Page::Approvals, _) => vec![
            ("a", "Approve"),
            ("r", "Reject"),
            ("Space", "Select"),
            ("A/R", "Bulk"),
            ("m", "Comment"),
        ],
        _ => vec![],
    };
    if matches!(app.current_page, Page::MyExpenses | Page::Approvals) {
        hints.extend([("/", "Search"), ("f", "Status"), ("o", "Sort"), ("x", "CSV")]);
    }
    hints.extend([("Tab", "Page"), ("t", "Theme"), ("q", "Quit")]);
    hints
}

fn prompt_text(prompt: &Prompt) -> String {
    match prompt {
        Prompt::Search => "Search".to_string(),
        Prompt::Reject(ids) if ids.len() > 1 => {
            format!("Rejection reason for {} expenses", ids.len())
        }
        Prompt::Reject(_) => "Rejection reason".to_string(),
        Prompt::Comment(_) => "Comment".to_string(),
        Prompt::Upload(_) => "Receipt file path".to_string(),
        Prompt::Expense { editing, field, .. } => format!(
            "{} expense · {}",
            if editing.is_some() { "Edit" } else { "New" },
            field.label()
        ),
        Prompt::Confirm(action) => format!("{} (y/n)", action.question()),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.palette();

    let spans = if let Some(prompt) = &app.prompt {
        let mut spans = vec![Span::styled(
            format!(" {}: ", prompt_text(prompt)),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )];
        if !matches!(prompt, Prompt::Confirm(_)) {
            spans.push(Span::raw(format!("{}█", app.input)));
        }
        if let Prompt::Expense {
            field: FormField::Amount,
            ..
        } = prompt
        {
            let typed = ExpenseForm {
                amount: app.input.clone(),
                ..Default::default()
            };
            if let Some(warning) = typed.receipt_warning() {
                spans.push(Span::styled(
                    format!("  ⚠ {}", warning),
                    Style::default().fg(palette.warning),
                ));
            }
        }
        spans
    } else if let Some(notice) = app.notifications.current(Instant::now()).cloned() {
        let (icon, color) = match notice.level {
            Level::Success => ("✓", palette.success),
            Level::Error => ("✗", palette.danger),
        };
        vec![Span::styled(
            format!(" {} {}", icon, notice.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )]
    } else {
        let mut spans = Vec::new();
        for (i, (key, action)) in key_hints(app).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            let key_color = if key == "q" { palette.danger } else { palette.accent };
            spans.push(Span::styled(key, Style::default().fg(key_color)));
            spans.push(Span::raw(format!(" {}", action)));
        }
        spans
    };

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.text)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty() && current_line.len() + word.len() + 1 > width {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_desk::timefmt::parse_timestamp;
    use expense_desk::{ApiClient, Config, LocalStore};
    use std::sync::Arc;

    fn offline_app() -> App {
        let store = Arc::new(LocalStore::open_in_memory().unwrap());
        let config = Config::default().with_api_url("http://127.0.0.1:9");
        let session = Session::new(ApiClient::new(&config, store).unwrap());
        App::new(
            session,
            ThemePreference { dark: true },
            std::env::temp_dir(),
        )
    }

    fn create_test_expense(title: &str, amount: f64, status: ExpenseStatus) -> ExpenseRequest {
        ExpenseRequest {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            creator_name: Some("Sam Lee".to_string()),
            category_id: None,
            category: None,
            title: title.to_string(),
            description: String::new(),
            amount,
            status,
            expense_date: parse_timestamp("2024-05-01").unwrap(),
            created_at: parse_timestamp("2024-05-02T09:00:00Z").unwrap(),
            updated_at: None,
            submitted_at: None,
            processed_at: None,
            processed_by: None,
            rejection_reason: None,
            attachment_urls: vec![],
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn notice(app: &mut App) -> Option<String> {
        app.notifications
            .current(Instant::now())
            .map(|n| n.message.clone())
    }

    #[test]
    fn test_palette_follows_theme() {
        let dark = Palette::for_theme(ThemePreference { dark: true });
        let light = Palette::for_theme(ThemePreference { dark: false });
        assert_ne!(dark.background, light.background);
        assert_eq!(dark.status(ExpenseStatus::Rejected), Color::Red);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = offline_app();
        app.expenses = vec![
            create_test_expense("A", 10.0, ExpenseStatus::Draft),
            create_test_expense("B", 20.0, ExpenseStatus::Draft),
            create_test_expense("C", 30.0, ExpenseStatus::Draft),
        ];
        app.reset_cursor();

        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.next();
        assert_eq!(app.selected_expense().unwrap().title, "B");
    }

    #[test]
    fn test_prompt_collects_input_and_escape_cancels() {
        let mut app = offline_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.prompt, Some(Prompt::Search));

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "a");

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        assert!(app.input.is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_delete_requires_draft() {
        let mut app = offline_app();
        app.expenses = vec![create_test_expense("Hotel", 80.0, ExpenseStatus::Approved)];
        app.reset_cursor();

        press(&mut app, KeyCode::Char('d'));
        assert!(app.prompt.is_none());
        assert_eq!(
            notice(&mut app).as_deref(),
            Some("Only draft expenses can be deleted")
        );
    }

    #[test]
    fn test_delete_can_be_cancelled() {
        let mut app = offline_app();
        let expense = create_test_expense("Hotel", 80.0, ExpenseStatus::Draft);
        let id = expense.id;
        app.expenses = vec![expense];
        app.reset_cursor();

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.prompt, Some(Prompt::Confirm(Pending::Delete(id))));

        press(&mut app, KeyCode::Char('n'));
        assert!(app.prompt.is_none());
        assert_eq!(app.expenses.len(), 1);
    }

    #[test]
    fn test_bulk_reject_waits_for_confirmation() {
        let mut app = offline_app();
        app.current_page = Page::Approvals;
        app.pending = vec![
            create_test_expense("Taxi", 40.0, ExpenseStatus::Submitted),
            create_test_expense("Dinner", 90.0, ExpenseStatus::Submitted),
        ];
        app.reset_cursor();
        let ids: Vec<Uuid> = app.pending.iter().map(|e| e.id).collect();

        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char('R'));
        for c in "duplicate".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.prompt,
            Some(Prompt::Confirm(Pending::BulkReject(
                ids.clone(),
                "duplicate".to_string()
            )))
        );

        press(&mut app, KeyCode::Char('n'));
        assert!(app.prompt.is_none());
        assert_eq!(app.selection.ids(), ids.as_slice());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_submit_blocked_without_receipt() {
        let mut app = offline_app();
        app.expenses = vec![create_test_expense("Flight", 450.0, ExpenseStatus::Draft)];
        app.reset_cursor();

        press(&mut app, KeyCode::Char('s'));
        assert!(notice(&mut app).unwrap().contains("receipt"));
    }

    #[test]
    fn test_comment_requires_reviewer() {
        let mut app = offline_app();
        app.expenses = vec![create_test_expense("Taxi", 30.0, ExpenseStatus::Draft)];
        app.reset_cursor();

        press(&mut app, KeyCode::Char('m'));
        assert!(app.prompt.is_none());
        assert_eq!(
            notice(&mut app).as_deref(),
            Some("Only managers and admins can add comments")
        );
    }

    #[test]
    fn test_new_expense_form_steps_through_fields() {
        let mut app = offline_app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.view_mode, ViewMode::Create);

        for c in "Taxi".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        match &app.prompt {
            Some(Prompt::Expense { form, field, .. }) => {
                assert_eq!(form.title, "Taxi");
                assert_eq!(*field, FormField::Amount);
            }
            other => panic!("unexpected prompt {:?}", other),
        }

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        assert_eq!(app.view_mode, ViewMode::List);
    }

    #[test]
    fn test_edit_skips_date_field() {
        assert_eq!(FormField::Description.next(true), None);
        assert_eq!(FormField::Description.next(false), Some(FormField::Date));
    }

    #[test]
    fn test_unauthorized_ends_session() {
        let mut app = offline_app();
        let outcome: Option<()> = app.handle(Err(ClientError::Unauthorized { message: None }));
        assert!(outcome.is_none());
        assert!(app.should_quit);
        assert!(app.session_expired);
    }

    #[test]
    fn test_other_errors_become_notices() {
        let mut app = offline_app();
        let outcome: Option<()> = app.handle(Err(ClientError::Api {
            status: 400,
            message: "Amount must be positive".to_string(),
        }));
        assert!(outcome.is_none());
        assert!(!app.should_quit);
        assert_eq!(notice(&mut app).as_deref(), Some("Amount must be positive"));
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut app = offline_app();
        press(&mut app, KeyCode::Char('t'));
        assert!(!app.theme.dark);
        assert_eq!(
            ThemePreference::load(app.session.store()).unwrap(),
            ThemePreference { dark: false }
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long expense title", 10), "a long ...");
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
