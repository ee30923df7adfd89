use serde::Deserialize;

use super::repo_types::{ExpenseEdit, NewExpense};
use crate::{
    dates::{date_or_today, parse_date},
    error::AppError,
};

pub const DEFAULT_PAYMENT_STATUS: &str = "Unpaid";

#[derive(Debug, Default, Deserialize)]
pub struct CreateExpenseRequest {
    pub date: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

pub(crate) fn check_amount(amount: f64) -> Result<f64, AppError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(AppError::validation("Amount must be a non-negative number"))
    }
}

impl TryFrom<CreateExpenseRequest> for NewExpense {
    type Error = AppError;

    fn try_from(req: CreateExpenseRequest) -> Result<Self, Self::Error> {
        let date = date_or_today(req.date.as_deref())
            .map_err(|_| AppError::validation("Invalid date format. Use YYYY-MM-DD."))?;
        let payment_status = if req.payment_status.trim().is_empty() {
            DEFAULT_PAYMENT_STATUS.to_owned()
        } else {
            req.payment_status
        };
        Ok(NewExpense {
            date,
            category: req.category,
            amount: check_amount(req.amount)?,
            payment_status,
            description: req.description,
            paid: req.paid,
        })
    }
}

impl TryFrom<UpdateExpenseRequest> for ExpenseEdit {
    type Error = AppError;

    fn try_from(req: UpdateExpenseRequest) -> Result<Self, Self::Error> {
        let date = parse_date(&req.date)
            .ok_or_else(|| AppError::validation("Invalid date format. Use YYYY-MM-DD."))?;
        Ok(ExpenseEdit {
            date,
            category: req.category,
            amount: check_amount(req.amount)?,
            description: req.description,
        })
    }
}
