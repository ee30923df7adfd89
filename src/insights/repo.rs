use anyhow::Context;
use sqlx::PgPool;

/// A table and date range to total amounts over, relative to `CURRENT_DATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    PaymentsLastWeek,
    PaymentsLastMonth,
    PaymentsThisMonth,
    ExpensesThisMonth,
    ExpensesLastMonth,
}

impl Window {
    fn sql(self) -> &'static str {
        match self {
            Window::PaymentsLastWeek => {
                "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM payments \
                 WHERE user_id = $1 AND payment_date >= CURRENT_DATE - INTERVAL '7 days'"
            }
            Window::PaymentsLastMonth => {
                "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM payments \
                 WHERE user_id = $1 \
                   AND payment_date >= date_trunc('month', CURRENT_DATE - INTERVAL '1 month') \
                   AND payment_date < date_trunc('month', CURRENT_DATE)"
            }
            Window::PaymentsThisMonth => {
                "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM payments \
                 WHERE user_id = $1 AND payment_date >= date_trunc('month', CURRENT_DATE)"
            }
            Window::ExpensesThisMonth => {
                "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM expenses \
                 WHERE user_id = $1 AND date >= date_trunc('month', CURRENT_DATE)"
            }
            Window::ExpensesLastMonth => {
                "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM expenses \
                 WHERE user_id = $1 \
                   AND date >= date_trunc('month', CURRENT_DATE - INTERVAL '1 month') \
                   AND date < date_trunc('month', CURRENT_DATE)"
            }
        }
    }
}

pub async fn total(db: &PgPool, user_id: i64, window: Window) -> anyhow::Result<f64> {
    let total: f64 = sqlx::query_scalar(window.sql())
        .bind(user_id)
        .fetch_one(db)
        .await
        .with_context(|| format!("total for {window:?}"))?;
    Ok(total)
}
