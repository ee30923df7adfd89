use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub email: String,
}

/// Partial profile update; absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateMeRequest {
    fn field(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        Self::field(&self.username)
    }

    pub fn email(&self) -> Option<&str> {
        Self::field(&self.email)
    }

    /// Passwords are taken verbatim; only an empty one is ignored.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.username().is_none() && self.email().is_none() && self.password().is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetBody {
    pub budget: f64,
}

#[derive(Debug, Serialize)]
pub struct BudgetUpdated {
    pub message: &'static str,
    pub budget: f64,
}
