use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::{Expense, ExpenseEdit, NewExpense};

const EXPENSE_COLUMNS: &str =
    "id, user_id, date, category, amount, payment_status, description, paid";

impl Expense {
    pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list expenses")?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, user_id: i64, new: &NewExpense) -> anyhow::Result<Expense> {
        let row = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (user_id, date, category, amount, payment_status, description, paid)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(new.date)
        .bind(&new.category)
        .bind(new.amount)
        .bind(&new.payment_status)
        .bind(&new.description)
        .bind(new.paid)
        .fetch_one(db)
        .await
        .context("insert expense")?;
        Ok(row)
    }

    /// `None` when no expense with this id belongs to `user_id`.
    pub async fn update(
        db: &PgPool,
        user_id: i64,
        id: i64,
        edit: &ExpenseEdit,
    ) -> anyhow::Result<Option<Expense>> {
        let row = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
               SET date = $1, category = $2, amount = $3, description = $4
             WHERE id = $5 AND user_id = $6
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(edit.date)
        .bind(&edit.category)
        .bind(edit.amount)
        .bind(&edit.description)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("update expense")?;
        Ok(row)
    }

    /// Payments referencing the expense keep their dangling `expense_id`.
    pub async fn delete(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await
            .context("delete expense")?;
        Ok(res.rows_affected() > 0)
    }

    /// Marks an owned expense paid. Another user's expense is left untouched
    /// and reported as zero rows affected.
    pub async fn mark_paid_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        id: i64,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query("UPDATE expenses SET paid = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .context("mark expense paid")?;
        Ok(res.rows_affected())
    }

    /// Category and description of an owned expense.
    pub async fn labels_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        id: i64,
    ) -> anyhow::Result<Option<(String, String)>> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT category, description FROM expenses WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .context("load expense labels")?;
        Ok(row)
    }
}
