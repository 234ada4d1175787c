//! Expense and expense-category route handlers.
//!
//! A straightforward fetch-filter-mutate loop over the backend's
//! `/api/admin/expenses` resources.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{AdminError, FieldError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{
    CreateExpenseInput, Expense, ExpenseCategory, ExpenseCategoryInput, ExpenseFilter,
    UpdateExpenseInput,
};
use crate::state::AppState;

fn validate_expense(title: &str, amount: Decimal) -> Result<()> {
    let mut fields = Vec::new();

    if title.trim().is_empty() {
        fields.push(FieldError::new("title", "must not be empty"));
    }
    if amount <= Decimal::ZERO {
        fields.push(FieldError::new("amount", "must be positive"));
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AdminError::Validation(fields))
    }
}

/// Expense list with category/date filters.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>> {
    let expenses = state
        .backend()
        .get_with_query("/api/admin/expenses", &filter)
        .await?;
    Ok(Json(expenses))
}

/// Create an expense.
#[instrument(skip(state, _admin, input))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateExpenseInput>,
) -> Result<(StatusCode, Json<Expense>)> {
    validate_expense(&input.title, input.amount)?;

    let expense = state.backend().post("/api/admin/expenses", &input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Update an expense.
#[instrument(skip(state, _admin, input))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(input): Json<UpdateExpenseInput>,
) -> Result<Json<Expense>> {
    if let (Some(title), Some(amount)) = (&input.title, input.amount) {
        validate_expense(title, amount)?;
    } else if let Some(amount) = input.amount
        && amount <= Decimal::ZERO
    {
        return Err(AdminError::Validation(vec![FieldError::new(
            "amount",
            "must be positive",
        )]));
    }

    let expense = state
        .backend()
        .patch(&format!("/api/admin/expenses/{id}"), &input)
        .await?;
    Ok(Json(expense))
}

/// Delete an expense.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state
        .backend()
        .delete(&format!("/api/admin/expenses/{id}"))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Expense category list.
#[instrument(skip(state, _admin))]
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<ExpenseCategory>>> {
    let categories = state.backend().get("/api/admin/expense-categories").await?;
    Ok(Json(categories))
}

/// Create an expense category.
#[instrument(skip(state, _admin, input))]
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<ExpenseCategoryInput>,
) -> Result<(StatusCode, Json<ExpenseCategory>)> {
    if input.name.trim().is_empty() {
        return Err(AdminError::Validation(vec![FieldError::new(
            "name",
            "must not be empty",
        )]));
    }

    let category = state
        .backend()
        .post("/api/admin/expense-categories", &input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete an expense category.
#[instrument(skip(state, _admin))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state
        .backend()
        .delete(&format!("/api/admin/expense-categories/{id}"))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_expense_rejects_blank_title_and_zero_amount() {
        let Err(AdminError::Validation(fields)) = validate_expense(" ", Decimal::ZERO) else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_validate_expense_accepts_good_input() {
        assert!(validate_expense("Packaging", Decimal::new(1250, 2)).is_ok());
    }
}
