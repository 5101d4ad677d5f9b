use crate::models::{BudgetStatus, CategorySpending, ExpenseAnalytics, MonthlyTrend};

/// Usage above this percentage is flagged before the budget runs out.
pub const BUDGET_WARNING_PERCENT: f64 = 80.0;

/// `$1234.50`
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Share of all spending that went to one category, in percent.
pub fn category_share(category: &CategorySpending, analytics: &ExpenseAnalytics) -> f64 {
    if analytics.total_expenses > 0.0 {
        category.total_amount / analytics.total_expenses * 100.0
    } else {
        0.0
    }
}

/// Each month's bar length relative to the biggest month, in percent.
pub fn trend_widths(trends: &[MonthlyTrend]) -> Vec<f64> {
    let max = trends
        .iter()
        .map(|t| t.total_amount)
        .fold(0.0_f64, f64::max);

    trends
        .iter()
        .map(|t| if max > 0.0 { t.total_amount / max * 100.0 } else { 0.0 })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetHealth {
    Healthy,
    Warning,
    Over,
}

impl BudgetHealth {
    pub fn of(status: &BudgetStatus) -> Self {
        if status.is_over_budget {
            BudgetHealth::Over
        } else if status.percentage_used > BUDGET_WARNING_PERCENT {
            BudgetHealth::Warning
        } else {
            BudgetHealth::Healthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetHealth::Healthy => "On track",
            BudgetHealth::Warning => "Near limit",
            BudgetHealth::Over => "Over budget",
        }
    }
}

/// Progress bar fill; overspend still draws a full bar.
pub fn bar_fill(percentage: f64) -> f64 {
    percentage.clamp(0.0, 100.0)
}

/// Text bar of `width` cells, e.g. `█████░░░░░`.
pub fn text_bar(percentage: f64, width: usize) -> String {
    let filled = ((bar_fill(percentage) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timefmt::parse_timestamp;

    fn create_test_budget(percentage_used: f64, is_over_budget: bool) -> BudgetStatus {
        BudgetStatus {
            budget_id: uuid::Uuid::new_v4(),
            budget_name: "Travel".to_string(),
            description: None,
            budget_amount: 1000.0,
            spent_amount: percentage_used * 10.0,
            remaining_amount: 1000.0 - percentage_used * 10.0,
            percentage_used,
            category_name: None,
            category_icon: None,
            start_date: parse_timestamp("2024-01-01").unwrap(),
            end_date: parse_timestamp("2024-12-31").unwrap(),
            days_remaining: 30,
            is_over_budget,
            is_active: true,
        }
    }

    fn trend(month: u32, total: f64) -> MonthlyTrend {
        MonthlyTrend {
            year: 2024,
            month,
            month_name: format!("M{}", month),
            total_amount: total,
            count: 1,
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5), "$1234.50");
        assert_eq!(format_money(0.0), "$0.00");
    }

    #[test]
    fn test_category_share() {
        let analytics = ExpenseAnalytics {
            total_expenses: 400.0,
            ..Default::default()
        };
        let category = CategorySpending {
            category_id: None,
            category_name: "Meals".to_string(),
            category_icon: String::new(),
            category_color: String::new(),
            total_amount: 100.0,
            count: 3,
        };
        assert_eq!(category_share(&category, &analytics), 25.0);
        assert_eq!(category_share(&category, &ExpenseAnalytics::default()), 0.0);
    }

    #[test]
    fn test_trend_widths_relative_to_max() {
        let widths = trend_widths(&[trend(1, 50.0), trend(2, 200.0), trend(3, 0.0)]);
        assert_eq!(widths, vec![25.0, 100.0, 0.0]);
        assert_eq!(trend_widths(&[trend(1, 0.0)]), vec![0.0]);
    }

    #[test]
    fn test_budget_health() {
        assert_eq!(BudgetHealth::of(&create_test_budget(40.0, false)), BudgetHealth::Healthy);
        assert_eq!(BudgetHealth::of(&create_test_budget(80.0, false)), BudgetHealth::Healthy);
        assert_eq!(BudgetHealth::of(&create_test_budget(85.0, false)), BudgetHealth::Warning);
        assert_eq!(BudgetHealth::of(&create_test_budget(130.0, true)), BudgetHealth::Over);
    }

    #[test]
    fn test_bar_clamps() {
        assert_eq!(bar_fill(130.0), 100.0);
        assert_eq!(bar_fill(-5.0), 0.0);
        assert_eq!(text_bar(50.0, 10), "█████░░░░░");
        assert_eq!(text_bar(250.0, 4), "████");
    }
}
