use serde::Serialize;
use sqlx::FromRow;
use time::Date;

use crate::dates::ymd;

/// A payment row joined with the labels of the expense it references, if
/// that expense still exists and belongs to the same user.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PaymentRow {
    pub id: i64,
    pub user_id: i64,
    pub payment_date: Date,
    pub amount: f64,
    pub expense_id: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub linked_category: Option<String>,
    pub linked_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "ymd")]
    pub payment_date: Date,
    pub amount: f64,
    pub expense_id: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// What a new payment settles.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentLink {
    /// Settles an expense; labels come from the expense.
    Expense(i64),
    /// Free-standing; labels are stored on the payment row.
    Manual {
        category: String,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub payment_date: Date,
    pub amount: f64,
    pub link: PaymentLink,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEdit {
    pub amount: f64,
    pub category: String,
    pub description: String,
}

impl From<PaymentRow> for Payment {
    /// A linked payment shows its expense's current labels. When the
    /// expense is gone (or not the caller's), the stored labels stay.
    fn from(row: PaymentRow) -> Self {
        let (category, description) = match (row.expense_id, row.linked_category, row.linked_description) {
            (Some(_), Some(category), Some(description)) => (Some(category), Some(description)),
            _ => (row.category, row.description),
        };
        Payment {
            id: row.id,
            user_id: row.user_id,
            payment_date: row.payment_date,
            amount: row.amount,
            expense_id: row.expense_id,
            category,
            description,
        }
    }
}
