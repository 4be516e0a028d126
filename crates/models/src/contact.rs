use crate::validation::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[\w\.-]+@[\w\.-]+\.\w+$").unwrap();
    static ref PHONE: Regex = Regex::new(r"^[\d\-\+\s\(\)]{7,20}$").unwrap();
}

/// Minimum length of a customer name after trimming
pub const MIN_NAME_LEN: usize = 2;

/// A syntactically valid email address, the identity key of a customer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !EMAIL.is_match(s) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self(s.to_owned()))
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Validates a reservation name and returns it trimmed
pub fn parse_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();

    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::InvalidName);
    }

    Ok(name.to_owned())
}

/// Normalizes an optional name: blank input counts as absent
pub fn optional_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

/// Validates an optional phone number; blank input counts as absent
pub fn parse_phone(phone: Option<&str>) -> Result<Option<String>, ValidationError> {
    match phone.map(str::trim).filter(|phone| !phone.is_empty()) {
        None => Ok(None),
        Some(phone) if PHONE.is_match(phone) => Ok(Some(phone.to_owned())),
        Some(_) => Err(ValidationError::InvalidPhone),
    }
}
