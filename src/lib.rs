// Expense Desk - Core Library
// Typed client for the expense approval API, shared by the CLI, TUI and tests

pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod models;
pub mod notify;
pub mod session;
pub mod storage;
pub mod theme;
pub mod timefmt;
pub mod views;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use export::{export_expenses_csv, generate_csv_filename, write_expenses_csv};
pub use models::{
    ApprovalRateData, AuditLog, Budget, BudgetStatus, BulkApproveResult, CategorySpending,
    CreateBudgetRequest, CreateExpenseRequest, CreatedId, ExpenseAnalytics, ExpenseCategory,
    ExpenseComment, ExpenseQuery, ExpenseRequest, ExpenseStatus, LoginRequest, LoginResponse,
    MonthlyTrend, PagedResult, RegisterRequest, SortDir, StatusDistribution, UpdateBudgetRequest,
    UpdateExpenseRequest, User, UserRole,
};
pub use notify::{Level, Notice, Notifications};
pub use session::Session;
pub use storage::LocalStore;
pub use theme::ThemePreference;
pub use views::{
    BudgetForm, ExpenseFilters, ExpenseForm, Page, Pager, Selection, SortOption, ViewMode,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
