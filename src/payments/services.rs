use anyhow::Context;
use tracing::{debug, info};

use super::repo_types::{NewPayment, Payment, PaymentLink, PaymentRow};
use crate::{error::AppResult, expenses::Expense, state::AppState};

/// Records a payment and, when it settles an expense, marks that expense
/// paid and reports the expense's labels.
///
/// All statements run in one transaction, so a payment is never stored
/// against an expense that stays unpaid. A reference to another user's
/// expense is stored as given but marks nothing.
pub async fn create_payment(
    state: &AppState,
    user_id: i64,
    new: NewPayment,
) -> AppResult<Payment> {
    let mut tx = state.db.begin().await.context("begin tx")?;

    let mut row = PaymentRow::insert_tx(&mut tx, user_id, &new).await?;

    if let PaymentLink::Expense(expense_id) = new.link {
        let marked = Expense::mark_paid_tx(&mut tx, user_id, expense_id).await?;
        if marked == 0 {
            debug!(user_id, expense_id, "linked expense not owned by caller; left untouched");
        }
        if let Some((category, description)) =
            Expense::labels_tx(&mut tx, user_id, expense_id).await?
        {
            row.linked_category = Some(category);
            row.linked_description = Some(description);
        }
    }

    tx.commit().await.context("commit tx")?;

    info!(user_id, payment_id = row.id, expense_id = ?row.expense_id, "payment recorded");
    Ok(row.into())
}
