//! Expense and expense-category models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{ExpenseCategoryId, ExpenseId};

/// A business expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub amount: Decimal,
    pub category_id: ExpenseCategoryId,
    /// The day the expense was incurred (not the day it was recorded).
    pub incurred_on: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An expense category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: ExpenseCategoryId,
    pub name: String,
}

/// Input for creating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpenseInput {
    pub title: String,
    pub amount: Decimal,
    pub category_id: ExpenseCategoryId,
    pub incurred_on: NaiveDate,
    pub notes: Option<String>,
}

/// Input for updating an expense; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExpenseInput {
    pub title: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<ExpenseCategoryId>,
    pub incurred_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for creating or renaming an expense category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategoryInput {
    pub name: String,
}

/// Filter and pagination for the expense list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub category_id: Option<ExpenseCategoryId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
