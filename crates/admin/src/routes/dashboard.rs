//! Dashboard route handler: aggregated counts and sums.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use orchard_core::OrderStatus;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Expense, ExpenseFilter, Order, OrderFilter, Product};
use crate::state::AppState;

/// Default reporting window in days.
const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Query parameters for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Reporting window in days (default 30).
    pub days: Option<i64>,
}

/// Aggregates for the reporting window.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub period_days: i64,
    pub orders_count: usize,
    pub cancelled_orders_count: usize,
    /// Sum of non-cancelled order totals.
    pub revenue: Decimal,
    pub expenses_total: Decimal,
    /// Revenue minus expenses.
    pub net: Decimal,
    pub products_count: usize,
}

/// Aggregate orders, expenses, and product counts for the window.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>> {
    let period_days = query.days.unwrap_or(DEFAULT_PERIOD_DAYS).max(1);
    let start_date = (Utc::now() - Duration::days(period_days)).date_naive();

    let orders: Vec<Order> = state
        .backend()
        .get_with_query(
            "/api/admin/orders",
            &OrderFilter {
                start_date: Some(start_date),
                ..OrderFilter::default()
            },
        )
        .await?;

    let expenses: Vec<Expense> = state
        .backend()
        .get_with_query(
            "/api/admin/expenses",
            &ExpenseFilter {
                start_date: Some(start_date),
                ..ExpenseFilter::default()
            },
        )
        .await?;

    let products: Vec<Product> = state.backend().get("/api/admin/products").await?;

    Ok(Json(summarize(
        period_days,
        &orders,
        &expenses,
        products.len(),
    )))
}

/// Fold the fetched lists into the dashboard aggregates.
fn summarize(
    period_days: i64,
    orders: &[Order],
    expenses: &[Expense],
    products_count: usize,
) -> DashboardView {
    let cancelled_orders_count = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Cancelled)
        .count();
    let revenue: Decimal = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total)
        .sum();
    let expenses_total: Decimal = expenses.iter().map(|e| e.amount).sum();

    DashboardView {
        period_days,
        orders_count: orders.len(),
        cancelled_orders_count,
        revenue,
        expenses_total,
        net: revenue - expenses_total,
        products_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use orchard_core::{ExpenseCategoryId, ExpenseId, OrderId, PaymentStatus, UserId};

    fn order(id: i32, total: i64, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new(uuid::Uuid::nil()),
            items: vec![],
            total: Decimal::new(total, 2),
            status,
            payment_status: PaymentStatus::Paid,
            created_at: Utc::now(),
        }
    }

    fn expense(id: i32, amount: i64) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            title: format!("Expense {id}"),
            amount: Decimal::new(amount, 2),
            category_id: ExpenseCategoryId::new(1),
            incurred_on: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_excludes_cancelled_revenue() {
        let orders = vec![
            order(1, 10_000, OrderStatus::Delivered),
            order(2, 5_000, OrderStatus::Cancelled),
            order(3, 2_500, OrderStatus::Pending),
        ];
        let expenses = vec![expense(1, 3_000), expense(2, 1_000)];

        let view = summarize(30, &orders, &expenses, 42);

        assert_eq!(view.orders_count, 3);
        assert_eq!(view.cancelled_orders_count, 1);
        assert_eq!(view.revenue, Decimal::new(12_500, 2));
        assert_eq!(view.expenses_total, Decimal::new(4_000, 2));
        assert_eq!(view.net, Decimal::new(8_500, 2));
        assert_eq!(view.products_count, 42);
    }

    #[test]
    fn test_summarize_empty_window() {
        let view = summarize(7, &[], &[], 0);
        assert_eq!(view.revenue, Decimal::ZERO);
        assert_eq!(view.net, Decimal::ZERO);
    }
}
