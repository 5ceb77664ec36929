//! Per-field rules for camp and talk payloads, checked before any store access.

use crate::error::AppError;
use crate::models::{CampModel, TalkModel};

/// Constraints on one field. Unset limits are not checked.
#[derive(Clone, Debug, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

impl FieldRule {
    pub fn check_text(&self, field: &str, value: &str) -> Result<(), AppError> {
        if self.required && value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} is required", field)));
        }
        let len = value.chars().count();
        if let Some(max) = self.max_length {
            if len > max {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, max
                )));
            }
        }
        if let Some(min) = self.min_length {
            if len < min {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    field, min
                )));
            }
        }
        Ok(())
    }

    pub fn check_number(&self, field: &str, value: i64) -> Result<(), AppError> {
        let below = self.minimum.is_some_and(|min| value < min);
        let above = self.maximum.is_some_and(|max| value > max);
        if below || above {
            return Err(AppError::Validation(match (self.minimum, self.maximum) {
                (Some(min), Some(max)) => format!("{} must be between {} and {}", field, min, max),
                (Some(min), None) => format!("{} must be at least {}", field, min),
                (None, Some(max)) => format!("{} must be at most {}", field, max),
                (None, None) => format!("{} is out of range", field),
            }));
        }
        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

impl Validate for CampModel {
    fn validate(&self) -> Result<(), AppError> {
        FieldRule {
            required: true,
            max_length: Some(100),
            ..Default::default()
        }
        .check_text("name", &self.name)?;
        FieldRule {
            required: true,
            ..Default::default()
        }
        .check_text("moniker", &self.moniker)?;
        FieldRule {
            minimum: Some(1),
            maximum: Some(100),
            ..Default::default()
        }
        .check_number("length", self.length.into())
    }
}

impl Validate for TalkModel {
    fn validate(&self) -> Result<(), AppError> {
        FieldRule {
            required: true,
            max_length: Some(100),
            ..Default::default()
        }
        .check_text("title", &self.title)?;
        FieldRule {
            required: true,
            min_length: Some(20),
            max_length: Some(4000),
            ..Default::default()
        }
        .check_text("abstract", &self.abstract_text)?;
        FieldRule {
            minimum: Some(100),
            maximum: Some(300),
            ..Default::default()
        }
        .check_number("level", self.level.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn camp() -> CampModel {
        serde_json::from_value(serde_json::json!({
            "name": "New Camp",
            "moniker": "NEW1",
            "eventDate": "2024-06-01"
        }))
        .unwrap()
    }

    fn talk() -> TalkModel {
        TalkModel {
            talk_id: 0,
            title: "Async Rust".into(),
            abstract_text: "Futures, executors and wakers explained".into(),
            level: 200,
            speaker: None,
        }
    }

    #[test]
    fn valid_payloads_pass() {
        assert!(camp().validate().is_ok());
        assert!(talk().validate().is_ok());
    }

    #[test]
    fn camp_requires_moniker() {
        let mut c = camp();
        c.moniker = "   ".into();
        let err = c.validate().unwrap_err();
        assert_eq!(err.to_string(), "moniker is required");
    }

    #[test]
    fn camp_length_range() {
        let mut c = camp();
        c.length = 0;
        assert_eq!(c.validate().unwrap_err().to_string(), "length must be between 1 and 100");
        c.length = 100;
        c.event_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn talk_abstract_too_short() {
        let mut t = talk();
        t.abstract_text = "short".into();
        assert_eq!(
            t.validate().unwrap_err().to_string(),
            "abstract must be at least 20 characters"
        );
    }

    #[test]
    fn talk_level_out_of_range() {
        let mut t = talk();
        t.level = 0;
        assert!(matches!(t.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn long_title_rejected() {
        let mut t = talk();
        t.title = "x".repeat(101);
        assert_eq!(t.validate().unwrap_err().to_string(), "title must be at most 100 characters");
    }
}
