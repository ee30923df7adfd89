use serde::Deserialize;

use super::repo_types::{NewPayment, PaymentEdit, PaymentLink};
use crate::{dates::date_or_today, error::AppError, expenses::check_amount};

#[derive(Debug, Default, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(default, alias = "date")]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub expense_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePaymentRequest {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<CreatePaymentRequest> for NewPayment {
    type Error = AppError;

    fn try_from(req: CreatePaymentRequest) -> Result<Self, Self::Error> {
        let payment_date = date_or_today(req.payment_date.as_deref())
            .map_err(|_| AppError::validation("Invalid payment_date format. Use YYYY-MM-DD."))?;
        let link = match req.expense_id {
            Some(id) => PaymentLink::Expense(id),
            None => PaymentLink::Manual {
                category: req.category.unwrap_or_default(),
                description: req.description.unwrap_or_default(),
            },
        };
        Ok(NewPayment {
            payment_date,
            amount: check_amount(req.amount)?,
            link,
        })
    }
}

impl TryFrom<UpdatePaymentRequest> for PaymentEdit {
    type Error = AppError;

    fn try_from(req: UpdatePaymentRequest) -> Result<Self, Self::Error> {
        Ok(PaymentEdit {
            amount: check_amount(req.amount)?,
            category: req.category,
            description: req.description,
        })
    }
}
