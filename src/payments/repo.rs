use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::{NewPayment, PaymentEdit, PaymentLink, PaymentRow};

/// Selects `PaymentRow` columns from a relation aliased `p`.
const JOINED_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.payment_date, p.amount, p.expense_id,
           p.category, p.description,
           e.category AS linked_category, e.description AS linked_description
"#;
const LINKED_EXPENSE_JOIN: &str =
    "LEFT JOIN expenses e ON e.id = p.expense_id AND e.user_id = p.user_id";

impl PaymentRow {
    pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<PaymentRow>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            {JOINED_SELECT}
            FROM payments p
            {LINKED_EXPENSE_JOIN}
            WHERE p.user_id = $1
            ORDER BY p.payment_date DESC, p.id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list payments")?;
        Ok(rows)
    }

    /// Inserts the payment row. For a linked payment the label columns stay NULL.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        new: &NewPayment,
    ) -> anyhow::Result<PaymentRow> {
        let (expense_id, category, description) = match &new.link {
            PaymentLink::Expense(id) => (Some(*id), None, None),
            PaymentLink::Manual {
                category,
                description,
            } => (None, Some(category.as_str()), Some(description.as_str())),
        };
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments (user_id, payment_date, amount, expense_id, category, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, payment_date, amount, expense_id, category, description,
                      NULL::TEXT AS linked_category, NULL::TEXT AS linked_description
            "#,
        )
        .bind(user_id)
        .bind(new.payment_date)
        .bind(new.amount)
        .bind(expense_id)
        .bind(category)
        .bind(description)
        .fetch_one(&mut **tx)
        .await
        .context("insert payment")?;
        Ok(row)
    }

    /// Overwrites amount and labels even on linked payments, where the stored
    /// labels are shadowed by the expense's on read.
    pub async fn update(
        db: &PgPool,
        user_id: i64,
        id: i64,
        edit: &PaymentEdit,
    ) -> anyhow::Result<Option<PaymentRow>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            WITH p AS (
                UPDATE payments
                   SET amount = $1, category = $2, description = $3
                 WHERE id = $4 AND user_id = $5
                RETURNING *
            )
            {JOINED_SELECT}
            FROM p
            {LINKED_EXPENSE_JOIN}
            "#
        ))
        .bind(edit.amount)
        .bind(&edit.category)
        .bind(&edit.description)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("update payment")?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM payments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await
            .context("delete payment")?;
        Ok(res.rows_affected() > 0)
    }
}
