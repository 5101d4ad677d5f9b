use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Budget, BudgetStatus, CreateBudgetRequest, CreatedId, UpdateBudgetRequest};

impl ApiClient {
    /// GET /budgets?activeOnly=
    pub fn budgets(&self, active_only: bool) -> Result<Vec<Budget>> {
        self.get(&format!("/budgets?activeOnly={}", active_only))
    }

    /// GET /budgets/status - spend against each budget, computed server-side
    pub fn budget_status(&self) -> Result<Vec<BudgetStatus>> {
        self.get("/budgets/status")
    }

    pub fn create_budget(&self, data: &CreateBudgetRequest) -> Result<CreatedId> {
        self.post("/budgets", data)
    }

    pub fn update_budget(&self, id: Uuid, data: &UpdateBudgetRequest) -> Result<()> {
        self.put_unit(&format!("/budgets/{}", id), data)
    }

    pub fn activate_budget(&self, id: Uuid) -> Result<()> {
        self.post_empty(&format!("/budgets/{}/activate", id))
    }

    pub fn deactivate_budget(&self, id: Uuid) -> Result<()> {
        self.post_empty(&format!("/budgets/{}/deactivate", id))
    }

    pub fn delete_budget(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/budgets/{}", id))
    }
}
