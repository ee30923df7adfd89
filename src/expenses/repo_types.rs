use serde::Serialize;
use sqlx::FromRow;
use time::Date;

use crate::dates::ymd;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "ymd")]
    pub date: Date,
    pub category: String,
    pub amount: f64,
    pub payment_status: String,
    pub description: String,
    pub paid: bool,
}

/// Validated fields for a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: Date,
    pub category: String,
    pub amount: f64,
    pub payment_status: String,
    pub description: String,
    pub paid: bool,
}

/// Validated fields for a full overwrite of an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEdit {
    pub date: Date,
    pub category: String,
    pub amount: f64,
    pub description: String,
}
