//! The structured result record parsed from backend answers
//!
//! Field names serialize in camelCase to match the corpus records and the
//! format instructions handed to the model.

use crate::parser::OutputSchema;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A pope, as extracted from a model answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pope {
    pub pontiff_number: u32,
    pub pontiff_start_date: NaiveDate,
    pub pontiff_end_date: Option<NaiveDate>,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    pub english_name: String,
    pub latin_name: String,
    pub personal_name: String,
    pub nationalities: Vec<String>,
}

impl Pope {
    /// Build a record from borrowed parts. The nationalities slice is
    /// copied so the record cannot alias a caller-owned buffer.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pontiff_number: u32,
        pontiff_start_date: NaiveDate,
        pontiff_end_date: Option<NaiveDate>,
        birth_date: NaiveDate,
        death_date: Option<NaiveDate>,
        english_name: &str,
        latin_name: &str,
        personal_name: &str,
        nationalities: &[String],
    ) -> Self {
        Self {
            pontiff_number,
            pontiff_start_date,
            pontiff_end_date,
            birth_date,
            death_date,
            english_name: english_name.to_string(),
            latin_name: latin_name.to_string(),
            personal_name: personal_name.to_string(),
            nationalities: nationalities.to_vec(),
        }
    }
}

impl OutputSchema for Pope {
    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "pontiffNumber": { "type": "integer" },
                "pontiffStartDate": { "type": "string", "format": "date" },
                "pontiffEndDate": { "type": ["string", "null"], "format": "date" },
                "birthDate": { "type": "string", "format": "date" },
                "deathDate": { "type": ["string", "null"], "format": "date" },
                "englishName": { "type": "string" },
                "latinName": { "type": "string" },
                "personalName": { "type": "string" },
                "nationalities": { "type": "array", "items": { "type": "string" } }
            },
            "required": [
                "pontiffNumber",
                "pontiffStartDate",
                "birthDate",
                "englishName",
                "latinName",
                "personalName",
                "nationalities"
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn francis() -> Pope {
        Pope::new(
            266,
            NaiveDate::from_ymd_opt(2013, 3, 13).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 4, 21).unwrap()),
            NaiveDate::from_ymd_opt(1936, 12, 17).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 4, 21).unwrap()),
            "Francis",
            "Franciscus",
            "Jorge Mario Bergoglio",
            &["Argentine".to_string()],
        )
    }

    #[test]
    fn test_nationalities_are_copied() {
        let mut source = vec!["Argentine".to_string()];
        let pope = Pope::new(
            266,
            NaiveDate::from_ymd_opt(2013, 3, 13).unwrap(),
            None,
            NaiveDate::from_ymd_opt(1936, 12, 17).unwrap(),
            None,
            "Francis",
            "Franciscus",
            "Jorge Mario Bergoglio",
            &source,
        );
        source[0] = "Italian".to_string();
        assert_eq!(pope.nationalities, vec!["Argentine".to_string()]);
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_value(francis()).unwrap();
        assert_eq!(json["pontiffNumber"], 266);
        assert_eq!(json["englishName"], "Francis");
        assert_eq!(json["pontiffStartDate"], "2013-03-13");
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = Pope::schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"pontiffNumber"));
        assert!(required.contains(&"nationalities"));
    }
}
