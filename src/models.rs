//! Wire-facing DTOs. JSON keys are camelCase.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn default_length() -> i32 {
    1
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub moniker: String,
    #[serde(with = "event_date")]
    pub event_date: NaiveDate,
    #[serde(default = "default_length")]
    pub length: i32,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub location_address1: Option<String>,
    #[serde(default)]
    pub location_address2: Option<String>,
    #[serde(default)]
    pub location_address3: Option<String>,
    #[serde(default)]
    pub location_city_town: Option<String>,
    #[serde(default)]
    pub location_state_province: Option<String>,
    #[serde(default)]
    pub location_postal_code: Option<String>,
    #[serde(default)]
    pub location_country: Option<String>,
    /// Read-only: only emitted when talks were loaded, ignored on input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talks: Option<Vec<TalkModel>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkModel {
    /// Assigned by the store. Ignored on input.
    #[serde(default)]
    pub talk_id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<SpeakerModel>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerModel {
    #[serde(default)]
    pub speaker_id: i32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub company_url: Option<String>,
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub git_hub: Option<String>,
}

/// Parse `YYYY-MM-DD` or an ISO date-time, keeping only the date part.
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub(crate) mod event_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_event_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camp_model_defaults_length_and_reads_date_time() {
        let m: CampModel = serde_json::from_value(json!({
            "moniker": "NEW1",
            "name": "New Camp",
            "eventDate": "2024-06-01T09:30:00"
        }))
        .unwrap();
        assert_eq!(m.length, 1);
        assert_eq!(m.event_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(m.talks.is_none());
    }

    #[test]
    fn camp_model_emits_date_only_and_skips_unloaded_talks() {
        let m: CampModel = serde_json::from_value(json!({
            "moniker": "NEW1",
            "name": "New Camp",
            "eventDate": "2024-06-01"
        }))
        .unwrap();
        let out = serde_json::to_value(&m).unwrap();
        assert_eq!(out["eventDate"], "2024-06-01");
        assert!(out.get("talks").is_none());
    }

    #[test]
    fn talk_model_uses_abstract_key() {
        let m: TalkModel = serde_json::from_value(json!({
            "title": "Rust",
            "abstract": "All about ownership and borrowing",
            "level": 200,
            "speaker": { "speakerId": 2 }
        }))
        .unwrap();
        assert_eq!(m.abstract_text, "All about ownership and borrowing");
        assert_eq!(m.speaker.map(|s| s.speaker_id), Some(2));
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(parse_event_date("June first").is_none());
        assert!(serde_json::from_value::<CampModel>(json!({ "eventDate": "2024-13-01" })).is_err());
    }
}
