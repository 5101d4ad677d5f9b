use chrono::NaiveDate;

use crate::client::{with_query, ApiClient};
use crate::error::Result;
use crate::models::{
    encode_pairs, ApprovalRateData, ExpenseAnalytics, ExpenseCategory, StatusDistribution,
};

/// Months of history the approval-rate charts ask for by default.
pub const DEFAULT_MONTHS_BACK: u32 = 6;

fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let mut pairs = Vec::new();
    if let Some(start) = start {
        pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = end {
        pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
    }
    encode_pairs(&pairs)
}

impl ApiClient {
    /// GET /analytics/my-expenses
    pub fn my_analytics(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<ExpenseAnalytics> {
        self.get(&with_query("/analytics/my-expenses", &date_range(start, end)))
    }

    /// GET /analytics/categories
    pub fn categories(&self) -> Result<Vec<ExpenseCategory>> {
        self.get("/analytics/categories")
    }

    pub fn status_distribution(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StatusDistribution>> {
        self.get(&with_query(
            "/analytics/status-distribution",
            &date_range(start, end),
        ))
    }

    pub fn approval_rates(&self, months_back: u32) -> Result<Vec<ApprovalRateData>> {
        self.get(&format!("/analytics/approval-rates?monthsBack={}", months_back))
    }

    // Manager/Admin views over the whole team

    pub fn manager_status_distribution(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StatusDistribution>> {
        self.get(&with_query(
            "/analytics/manager/status-distribution",
            &date_range(start, end),
        ))
    }

    pub fn manager_approval_rates(&self, months_back: u32) -> Result<Vec<ApprovalRateData>> {
        self.get(&format!(
            "/analytics/manager/approval-rates?monthsBack={}",
            months_back
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_query() {
        assert_eq!(date_range(None, None), "");
        assert_eq!(
            date_range(NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 6, 30)),
            "startDate=2024-01-01&endDate=2024-06-30"
        );
        assert_eq!(
            date_range(None, NaiveDate::from_ymd_opt(2024, 6, 30)),
            "endDate=2024-06-30"
        );
    }
}
