// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use expense_desk::api::analytics::DEFAULT_MONTHS_BACK;
use expense_desk::config::LOG_ENV;
use expense_desk::dashboard::{category_share, format_money, text_bar, BudgetHealth};
use expense_desk::timefmt::{format_date, format_datetime, format_short};
use expense_desk::views::{
    find_sort, today, APPROVALS_PAGE_SIZE, APPROVALS_SORTS, MY_EXPENSES_PAGE_SIZE,
    MY_EXPENSES_SORTS,
};
use expense_desk::{
    export_expenses_csv, BudgetForm, ClientError, Config, ExpenseFilters, ExpenseForm,
    ExpenseRequest, ExpenseStatus, LoginRequest, PagedResult, Pager, RegisterRequest, Session,
    SortOption, ThemePreference, UserRole,
};

/// Expense Desk - submit, review and track expenses from the terminal
#[derive(Parser, Debug)]
#[command(name = "expense-desk", version)]
#[command(about = "Terminal client for the expense reporting and approval API")]
struct Cli {
    /// Backend base URL (falls back to EXPENSE_API_URL, then http://localhost:5000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the session store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "EXPENSE_DESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, env = "EXPENSE_DESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Your own expense requests
    Expenses {
        #[command(subcommand)]
        command: ExpenseCommand,
    },
    /// Review submitted expenses (managers and admins)
    Approvals {
        #[command(subcommand)]
        command: ApprovalCommand,
    },
    /// Spending caps and their usage
    Budgets {
        #[command(subcommand)]
        command: BudgetCommand,
    },
    /// Aggregates computed by the backend
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
    /// Dark/light preference for the TUI
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
    /// Interactive terminal UI (default)
    Tui,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    List(ListArgs),
    Show { id: Uuid },
    Create(ExpenseFields),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: ExpenseFields,
    },
    Submit { id: Uuid },
    Delete {
        id: Uuid,
        #[arg(long, short)]
        yes: bool,
    },
    /// Link an already-hosted receipt URL
    Attach { id: Uuid, url: String },
    /// Upload a receipt file
    Upload { id: Uuid, file: PathBuf },
    Audit { id: Uuid },
    Comments { id: Uuid },
    Comment { id: Uuid, text: String },
    Export {
        #[command(flatten)]
        list: ListArgs,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ApprovalCommand {
    List(ListArgs),
    Approve {
        id: Uuid,
        #[arg(long, short)]
        yes: bool,
    },
    Reject {
        id: Uuid,
        #[arg(long)]
        reason: String,
    },
    BulkApprove {
        #[arg(required = true)]
        ids: Vec<Uuid>,
        #[arg(long, short)]
        yes: bool,
    },
    BulkReject {
        #[arg(required = true)]
        ids: Vec<Uuid>,
        #[arg(long)]
        reason: String,
        #[arg(long, short)]
        yes: bool,
    },
    Export {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    List {
        /// Include inactive budgets
        #[arg(long)]
        all: bool,
    },
    Status,
    Create(BudgetFields),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: BudgetFields,
    },
    Activate { id: Uuid },
    Deactivate { id: Uuid },
    Delete {
        id: Uuid,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommand {
    Summary {
        #[arg(long)]
        from: Option<chrono::NaiveDate>,
        #[arg(long)]
        to: Option<chrono::NaiveDate>,
    },
    Status {
        /// Team-wide numbers (managers and admins)
        #[arg(long)]
        team: bool,
        #[arg(long)]
        from: Option<chrono::NaiveDate>,
        #[arg(long)]
        to: Option<chrono::NaiveDate>,
    },
    Rates {
        #[arg(long)]
        team: bool,
        #[arg(long, default_value_t = DEFAULT_MONTHS_BACK)]
        months: u32,
    },
    Categories,
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    Show,
    Toggle,
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long)]
    category: Option<Uuid>,
    /// YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    #[arg(long)]
    min: Option<String>,
    #[arg(long)]
    max: Option<String>,
    /// field-dir, e.g. amount-desc
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
}

#[derive(Args, Debug)]
struct ExpenseFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    amount: String,
    /// YYYY-MM-DD, defaults to today (ignored on update)
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long)]
    category: Option<Uuid>,
}

#[derive(Args, Debug)]
struct BudgetFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    amount: String,
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
    #[arg(long)]
    category: Option<Uuid>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl From<StatusArg> for ExpenseStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => ExpenseStatus::Draft,
            StatusArg::Submitted => ExpenseStatus::Submitted,
            StatusArg::Approved => ExpenseStatus::Approved,
            StatusArg::Rejected => ExpenseStatus::Rejected,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Employee,
    Manager,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Employee => UserRole::Employee,
            RoleArg::Manager => UserRole::Manager,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Tui));
    init_tracing(interactive);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<ClientError>() {
            Some(client_err) => eprintln!("❌ {}", client_err.user_message()),
            None => eprintln!("❌ {:#}", err),
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr; the TUI stays quiet unless a filter is set explicitly.
fn init_tracing(interactive: bool) {
    let default = if interactive { "off" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.api_url, cli.data_dir);
    let mut session = Session::open(&config).context("Failed to open session store")?;

    match cli.command {
        None | Some(Command::Tui) => run_ui_mode(session, &config),
        Some(Command::Login { email, password }) => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let user = session.login(&LoginRequest { email, password })?;
            println!("✓ Welcome back, {}!", user.full_name);
            Ok(())
        }
        Some(Command::Register {
            email,
            full_name,
            password,
            role,
        }) => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            session.register(&RegisterRequest {
                email,
                password,
                full_name,
                role: role.map(UserRole::from),
            })?;
            println!("✓ Registration successful! Please login.");
            Ok(())
        }
        Some(Command::Logout) => {
            session.logout()?;
            println!("✓ Logged out successfully");
            Ok(())
        }
        Some(Command::Whoami) => {
            require_login(&mut session)?;
            if let Some(user) = session.user() {
                println!("{} <{}> ({})", user.full_name, user.email, user.role.name());
            }
            Ok(())
        }
        Some(Command::Expenses { command }) => {
            require_login(&mut session)?;
            run_expenses(&session, command)
        }
        Some(Command::Approvals { command }) => {
            require_login(&mut session)?;
            if !session.can_approve() {
                bail!("Approvals are only available to managers and admins");
            }
            run_approvals(&session, command)
        }
        Some(Command::Budgets { command }) => {
            require_login(&mut session)?;
            run_budgets(&session, command)
        }
        Some(Command::Analytics { command }) => {
            require_login(&mut session)?;
            run_analytics(&session, command)
        }
        Some(Command::Theme { command }) => {
            let mut theme = ThemePreference::load(session.store())?;
            if let ThemeCommand::Toggle = command {
                theme.toggle(session.store())?;
            }
            println!("Theme: {}", theme.label());
            Ok(())
        }
    }
}

fn require_login(session: &mut Session) -> Result<()> {
    if !session.restore()? {
        bail!("Not logged in. Run `expense-desk login --email <EMAIL>` first.");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn list_query(
    args: &ListArgs,
    sorts: &[SortOption],
    page_size: u32,
) -> Result<expense_desk::ExpenseQuery> {
    let sort = match &args.sort {
        Some(key) => match find_sort(sorts, key) {
            Some(sort) => sort,
            None => bail!("Unknown sort '{}'", key),
        },
        None => sorts[0],
    };
    let filters = ExpenseFilters {
        search: args.search.clone().unwrap_or_default(),
        status: args.status.map(ExpenseStatus::from),
        category_id: args.category,
        from_date: args.from.clone().unwrap_or_default(),
        to_date: args.to.clone().unwrap_or_default(),
        min_amount: args.min.clone().unwrap_or_default(),
        max_amount: args.max.clone().unwrap_or_default(),
    };
    let mut pager = Pager::new(page_size);
    pager.page = args.page.max(1);
    Ok(filters.to_query(sort, &pager))
}

// ============================================================================
// EXPENSES
// ============================================================================

fn run_expenses(session: &Session, command: ExpenseCommand) -> Result<()> {
    let client = session.client();

    match command {
        ExpenseCommand::List(args) => {
            let query = list_query(&args, &MY_EXPENSES_SORTS, MY_EXPENSES_PAGE_SIZE)?;
            print_expense_page(&client.my_expenses(&query)?);
        }
        ExpenseCommand::Show { id } => {
            let expense = client.expense(id)?;
            print_expense_detail(&expense);
        }
        ExpenseCommand::Create(fields) => {
            let form = ExpenseForm {
                title: fields.title,
                description: fields.description,
                amount: fields.amount,
                expense_date: fields.date,
                category_id: fields.category,
            };
            if let Some(warning) = form.receipt_warning() {
                println!("⚠️  {}", warning);
            }
            let created = client.create_expense(&form.to_create(today())?)?;
            println!("✓ Expense created successfully ({})", created.id);
        }
        ExpenseCommand::Update { id, fields } => {
            let form = ExpenseForm {
                title: fields.title,
                description: fields.description,
                amount: fields.amount,
                expense_date: String::new(),
                category_id: fields.category,
            };
            client.update_expense(id, &form.to_update()?)?;
            println!("✓ Expense updated successfully");
        }
        ExpenseCommand::Submit { id } => {
            let expense = client.expense(id)?;
            if expense.needs_receipt() {
                bail!("Expenses over $100 require a receipt attachment before submission");
            }
            client.submit_expense(id)?;
            println!("✓ Expense submitted for approval");
        }
        ExpenseCommand::Delete { id, yes } => {
            if confirm("Are you sure you want to delete this expense?", yes)? {
                client.delete_expense(id)?;
                println!("✓ Expense deleted");
            }
        }
        ExpenseCommand::Attach { id, url } => {
            client.add_attachment(id, &url)?;
            println!("✓ Attachment added");
        }
        ExpenseCommand::Upload { id, file } => {
            client.upload_receipt(id, &file)?;
            println!("✓ Receipt uploaded");
        }
        ExpenseCommand::Audit { id } => {
            let logs = client.audit_history(id)?;
            if logs.is_empty() {
                println!("No audit history");
            }
            for log in logs {
                let transition = match (log.previous_status, log.new_status) {
                    (Some(from), Some(to)) => format!("{} → {}", from.name(), to.name()),
                    (None, Some(to)) => to.name().to_string(),
                    _ => String::new(),
                };
                println!(
                    "{}  {:<12} {:<22} {}",
                    format_datetime(&log.timestamp),
                    log.action,
                    transition,
                    log.details.unwrap_or_default()
                );
            }
        }
        ExpenseCommand::Comments { id } => {
            let comments = client.comments(id)?;
            if comments.is_empty() {
                println!("No comments yet");
            }
            for comment in comments {
                println!(
                    "{}  {}: {}",
                    format_datetime(&comment.created_at),
                    comment.user_name,
                    comment.text
                );
            }
        }
        ExpenseCommand::Comment { id, text } => {
            if !session.can_comment() {
                bail!("Only managers and admins can add comments");
            }
            client.add_comment(id, &text)?;
            println!("✓ Comment added successfully");
        }
        ExpenseCommand::Export { list, out } => {
            let query = list_query(&list, &MY_EXPENSES_SORTS, MY_EXPENSES_PAGE_SIZE)?;
            let page = client.my_expenses(&query)?;
            let path = export_expenses_csv(&out, "expenses", &page.items)?;
            println!("✓ Expenses exported to {}", path.display());
        }
    }

    Ok(())
}

// ============================================================================
// APPROVALS
// ============================================================================

fn run_approvals(session: &Session, command: ApprovalCommand) -> Result<()> {
    let client = session.client();

    match command {
        ApprovalCommand::List(args) => {
            let query = list_query(&args, &APPROVALS_SORTS, APPROVALS_PAGE_SIZE)?;
            let page = client.pending_expenses(&query)?;
            print_expense_page(&page);
            for expense in page.items.iter().filter(|e| e.needs_receipt()) {
                println!("⚠️  {} is over $100 and has no receipt", expense.id);
            }
        }
        ApprovalCommand::Approve { id, yes } => {
            if confirm("Are you sure you want to approve this expense?", yes)? {
                client.approve_expense(id)?;
                println!("✓ Expense approved successfully");
            }
        }
        ApprovalCommand::Reject { id, reason } => {
            client.reject_expense(id, &reason)?;
            println!("✓ Expense rejected successfully");
        }
        ApprovalCommand::BulkApprove { ids, yes } => {
            if confirm(&format!("Approve {} selected expenses?", ids.len()), yes)? {
                let result = client.bulk_approve(&ids)?;
                println!("✓ Approved {} expenses.", result.approved.len());
                for id in result.failed {
                    println!("❌ Could not approve {}", id);
                }
            }
        }
        ApprovalCommand::BulkReject { ids, reason, yes } => {
            if confirm(&format!("Reject {} selected expenses?", ids.len()), yes)? {
                let rejected = client.bulk_reject(&ids, &reason)?;
                println!("✓ Rejected {} expenses.", rejected);
            }
        }
        ApprovalCommand::Export { list, out } => {
            let query = list_query(&list, &APPROVALS_SORTS, APPROVALS_PAGE_SIZE)?;
            let page = client.pending_expenses(&query)?;
            let path = export_expenses_csv(&out, "pending-approvals", &page.items)?;
            println!("✓ Expenses exported to {}", path.display());
        }
    }

    Ok(())
}

// ============================================================================
// BUDGETS
// ============================================================================

fn budget_form(fields: BudgetFields) -> BudgetForm {
    BudgetForm {
        name: fields.name,
        description: fields.description,
        amount: fields.amount,
        start_date: fields.start,
        end_date: fields.end,
        category_id: fields.category,
    }
}

fn run_budgets(session: &Session, command: BudgetCommand) -> Result<()> {
    let client = session.client();

    match command {
        BudgetCommand::List { all } => {
            let budgets = client.budgets(!all)?;
            if budgets.is_empty() {
                println!("No budgets");
            }
            for budget in budgets {
                println!(
                    "{}  {:<24} {:>12}  {} - {}  {}",
                    budget.id,
                    budget.name,
                    format_money(budget.amount),
                    format_short(&budget.start_date),
                    format_short(&budget.end_date),
                    if budget.is_active { "active" } else { "inactive" }
                );
            }
        }
        BudgetCommand::Status => {
            for status in client.budget_status()? {
                let health = BudgetHealth::of(&status);
                println!(
                    "{:<24} {} {:>5.1}%  {} spent of {}  ({} left, {} days)  {}",
                    status.budget_name,
                    text_bar(status.percentage_used, 20),
                    status.percentage_used,
                    format_money(status.spent_amount),
                    format_money(status.budget_amount),
                    format_money(status.remaining_amount),
                    status.days_remaining,
                    health.label()
                );
            }
        }
        BudgetCommand::Create(fields) => {
            let created = client.create_budget(&budget_form(fields).to_create()?)?;
            println!("✓ Budget created successfully! ({})", created.id);
        }
        BudgetCommand::Update { id, fields } => {
            client.update_budget(id, &budget_form(fields).to_update()?)?;
            println!("✓ Budget updated successfully");
        }
        BudgetCommand::Activate { id } => {
            client.activate_budget(id)?;
            println!("✓ Budget activated");
        }
        BudgetCommand::Deactivate { id } => {
            client.deactivate_budget(id)?;
            println!("✓ Budget deactivated");
        }
        BudgetCommand::Delete { id, yes } => {
            if confirm("Are you sure you want to delete this budget?", yes)? {
                client.delete_budget(id)?;
                println!("✓ Budget deleted successfully");
            }
        }
    }

    Ok(())
}

// ============================================================================
// ANALYTICS
// ============================================================================

fn run_analytics(session: &Session, command: AnalyticsCommand) -> Result<()> {
    let team_allowed = session.can_approve();
    let client = session.client();

    match command {
        AnalyticsCommand::Summary { from, to } => {
            let analytics = client.my_analytics(from, to)?;
            println!("Total:    {} ({} expenses)", format_money(analytics.total_expenses), analytics.total_count);
            println!("Approved: {} ({})", format_money(analytics.approved_amount), analytics.approved_count);
            println!("Pending:  {} ({})", format_money(analytics.pending_amount), analytics.pending_count);
            println!("Rejected: {}", analytics.rejected_count);
            println!("Average:  {}", format_money(analytics.average_expense));

            if !analytics.category_breakdown.is_empty() {
                println!("\nBy category");
                for category in &analytics.category_breakdown {
                    let share = category_share(category, &analytics);
                    println!(
                        "  {:<20} {} {:>5.1}%  {}",
                        category.category_name,
                        text_bar(share, 20),
                        share,
                        format_money(category.total_amount)
                    );
                }
            }
        }
        AnalyticsCommand::Status { team, from, to } => {
            let rows = if team {
                if !team_allowed {
                    bail!("Team analytics are only available to managers and admins");
                }
                client.manager_status_distribution(from, to)?
            } else {
                client.status_distribution(from, to)?
            };
            for row in rows {
                println!(
                    "{:<10} {:>4}  {:>12}  {:>5.1}%",
                    row.status,
                    row.count,
                    format_money(row.total_amount),
                    row.percentage
                );
            }
        }
        AnalyticsCommand::Rates { team, months } => {
            let rows = if team {
                if !team_allowed {
                    bail!("Team analytics are only available to managers and admins");
                }
                client.manager_approval_rates(months)?
            } else {
                client.approval_rates(months)?
            };
            for row in rows {
                println!(
                    "{:<10} submitted {:>4}  approved {:>4} ({:>5.1}%)  rejected {:>4} ({:>5.1}%)",
                    row.period,
                    row.total_submitted,
                    row.approved,
                    row.approval_rate,
                    row.rejected,
                    row.rejection_rate
                );
            }
        }
        AnalyticsCommand::Categories => {
            for category in client.categories()? {
                println!("{}  {} {}", category.id, category.icon, category.name);
            }
        }
    }

    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_expense_page(page: &PagedResult<ExpenseRequest>) {
    if page.items.is_empty() {
        println!("No expenses found");
        return;
    }

    println!(
        "{:<36}  {:<28} {:>10}  {:<9}  {:<10}  {}",
        "ID", "Title", "Amount", "Status", "Date", "Creator"
    );
    for expense in &page.items {
        println!(
            "{:<36}  {:<28} {:>10}  {:<9}  {:<10}  {}",
            expense.id,
            truncate(&expense.title, 28),
            format!("{:.2}", expense.amount),
            expense.status.name(),
            format_date(&expense.expense_date),
            expense.creator_display()
        );
    }
    println!(
        "\nPage {} of {} ({} total)",
        page.page,
        page.total_pages().max(1),
        page.total_count
    );
}

fn print_expense_detail(expense: &ExpenseRequest) {
    println!("{}", expense.title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("ID:          {}", expense.id);
    println!("Status:      {}", expense.status.name());
    println!("Amount:      {}", format_money(expense.amount));
    println!("Category:    {}", expense.category_name());
    println!("Date:        {}", format_date(&expense.expense_date));
    println!("Created:     {}", format_datetime(&expense.created_at));
    if let Some(at) = &expense.submitted_at {
        println!("Submitted:   {}", format_datetime(at));
    }
    if let Some(at) = &expense.processed_at {
        println!(
            "Processed:   {} by {}",
            format_datetime(at),
            expense.processed_by.as_deref().unwrap_or("-")
        );
    }
    if let Some(reason) = &expense.rejection_reason {
        println!("Rejected:    {}", reason);
    }
    println!("Creator:     {}", expense.creator_display());
    if !expense.description.is_empty() {
        println!("\n{}", expense.description);
    }
    for (index, url) in expense.attachment_urls.iter().enumerate() {
        println!("📎 Receipt {}: {}", index + 1, url);
    }
    if expense.needs_receipt() {
        println!("⚠️  Expenses over $100 require a receipt attachment before submission");
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(mut session: Session, config: &Config) -> Result<()> {
    if !session.restore()? {
        bail!("Not logged in. Run `expense-desk login --email <EMAIL>` first.");
    }

    let theme = ThemePreference::load(session.store())?;
    let mut app = ui::App::new(session, theme, config.data_dir.join("exports"));
    app.reload();
    ui::run_ui(&mut app)?;

    if app.session_expired {
        bail!(ClientError::Unauthorized { message: None });
    }
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_session: Session, _config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the subcommands: expense-desk --help");
    std::process::exit(1);
}
