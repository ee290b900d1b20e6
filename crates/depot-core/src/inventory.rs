use crate::error::{DepotError, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const MAX_NAME_LEN: usize = 120;

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: u64,
    pub name: String,
    pub serial_number: String,
    pub category: String,
    #[serde(default)]
    pub supplier_id: Option<u64>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

/// The equipment registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
}

impl NewEquipment {
    /// Trim text fields and check them before anything is sent.
    pub fn validate(mut self) -> Result<Self> {
        self.name = required_name("name", &self.name)?;
        self.category = required_name("category", &self.category)?;
        self.serial_number = self.serial_number.trim().to_string();
        if !serial_re().is_match(&self.serial_number) {
            return Err(DepotError::validation(
                "serial_number",
                "must start with a letter or digit and contain only letters, digits, '-', '_' or '/' (max 64)",
            ));
        }
        if let Some(cost) = self.unit_cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(DepotError::validation(
                    "unit_cost",
                    "must be a non-negative amount",
                ));
            }
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Supplier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The supplier registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewSupplier {
    pub fn validate(mut self) -> Result<Self> {
        self.name = required_name("name", &self.name)?;
        self.email = self.email.trim().to_string();
        if !email_re().is_match(&self.email) {
            return Err(DepotError::validation("email", "must look like name@example.com"));
        }
        if let Some(phone) = optional_text(self.phone.take()) {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if !phone_re().is_match(&phone) || !(6..=20).contains(&digits) {
                return Err(DepotError::validation(
                    "phone",
                    "must contain 6 to 20 digits and only digits, spaces, '+', '-', '(' or ')'",
                ));
            }
            self.phone = Some(phone);
        }
        self.contact_name = optional_text(self.contact_name.take());
        self.address = optional_text(self.address.take());
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

static SERIAL_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn serial_re() -> &'static Regex {
    SERIAL_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_/\-]{0,63}$").unwrap())
}

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn phone_re() -> &'static Regex {
    PHONE_RE.get_or_init(|| Regex::new(r"^[0-9+()\- ]+$").unwrap())
}

fn required_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DepotError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DepotError::validation(
            field,
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
