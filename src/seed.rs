//! Sample data loaded into an empty store: one camp, two speakers, two talks.
//! Speakers cannot be created over the API, so a fresh store needs these.

use crate::entities::{Camp, Location, Speaker, Talk};
use chrono::NaiveDate;

pub struct SeedData {
    pub speakers: Vec<Speaker>,
    pub camp: Camp,
    /// `speaker_id` indexes into `speakers` (1-based, in insertion order).
    pub talks: Vec<Talk>,
}

pub fn sample() -> SeedData {
    let speakers = vec![
        Speaker {
            speaker_id: 1,
            first_name: "Shawn".into(),
            last_name: "Wildermuth".into(),
            middle_name: None,
            company: Some("Wilder Minds LLC".into()),
            company_url: Some("http://wilderminds.com".into()),
            blog_url: Some("http://wildermuth.com".into()),
            twitter: Some("shawnwildermuth".into()),
            git_hub: Some("shawnwildermuth".into()),
        },
        Speaker {
            speaker_id: 2,
            first_name: "Resa".into(),
            last_name: "Wildermuth".into(),
            middle_name: None,
            company: Some("Wilder Minds LLC".into()),
            company_url: Some("http://wilderminds.com".into()),
            blog_url: Some("http://shawnandresa.com".into()),
            twitter: Some("resawildermuth".into()),
            git_hub: Some("resawildermuth".into()),
        },
    ];
    let camp = Camp {
        camp_id: 1,
        moniker: "ATL2018".into(),
        name: "Atlanta Code Camp".into(),
        event_date: NaiveDate::from_ymd_opt(2018, 10, 18).unwrap_or_default(),
        length: 1,
        location: Location {
            venue: Some("Atlanta Convention Center".into()),
            address1: Some("123 Main Street".into()),
            address2: None,
            address3: None,
            city_town: Some("Atlanta".into()),
            state_province: Some("GA".into()),
            postal_code: Some("12345".into()),
            country: Some("USA".into()),
        },
        talks: None,
    };
    let talks = vec![
        Talk {
            talk_id: 1,
            camp_id: 1,
            speaker_id: 1,
            title: "Entity Framework From Scratch".into(),
            abstract_text: "Working with Entity Framework is a lot of fun".into(),
            level: 100,
            speaker: None,
        },
        Talk {
            talk_id: 2,
            camp_id: 1,
            speaker_id: 2,
            title: "Writing Sample Data Made Easy".into(),
            abstract_text: "Thinking of good sample data examples is tiring.".into(),
            level: 200,
            speaker: None,
        },
    ];
    SeedData { speakers, camp, talks }
}
