//! Explicit DTO <-> entity conversions.
//!
//! Outbound: `From<&Entity>` for each model. Inbound: `to_entity` builds a new,
//! unsaved entity; `apply_to` copies the client-settable fields onto an existing
//! one and leaves keys and associations alone.

use crate::entities::{Camp, Location, Speaker, Talk};
use crate::models::{CampModel, SpeakerModel, TalkModel};

impl From<&Camp> for CampModel {
    fn from(camp: &Camp) -> Self {
        let loc = &camp.location;
        CampModel {
            name: camp.name.clone(),
            moniker: camp.moniker.clone(),
            event_date: camp.event_date,
            length: camp.length,
            venue: loc.venue.clone(),
            location_address1: loc.address1.clone(),
            location_address2: loc.address2.clone(),
            location_address3: loc.address3.clone(),
            location_city_town: loc.city_town.clone(),
            location_state_province: loc.state_province.clone(),
            location_postal_code: loc.postal_code.clone(),
            location_country: loc.country.clone(),
            talks: camp
                .talks
                .as_ref()
                .map(|talks| talks.iter().map(TalkModel::from).collect()),
        }
    }
}

impl CampModel {
    pub fn to_entity(&self) -> Camp {
        let mut camp = Camp {
            camp_id: 0,
            moniker: String::new(),
            name: String::new(),
            event_date: self.event_date,
            length: 0,
            location: Location::default(),
            talks: None,
        };
        self.apply_to(&mut camp);
        camp
    }

    pub fn apply_to(&self, camp: &mut Camp) {
        camp.name = self.name.clone();
        camp.moniker = self.moniker.clone();
        camp.event_date = self.event_date;
        camp.length = self.length;
        camp.location = Location {
            venue: self.venue.clone(),
            address1: self.location_address1.clone(),
            address2: self.location_address2.clone(),
            address3: self.location_address3.clone(),
            city_town: self.location_city_town.clone(),
            state_province: self.location_state_province.clone(),
            postal_code: self.location_postal_code.clone(),
            country: self.location_country.clone(),
        };
    }
}

impl From<&Talk> for TalkModel {
    fn from(talk: &Talk) -> Self {
        TalkModel {
            talk_id: talk.talk_id,
            title: talk.title.clone(),
            abstract_text: talk.abstract_text.clone(),
            level: talk.level,
            speaker: talk.speaker.as_ref().map(SpeakerModel::from),
        }
    }
}

impl TalkModel {
    /// The new talk has no camp or speaker yet; callers attach both.
    pub fn to_entity(&self) -> Talk {
        let mut talk = Talk {
            talk_id: 0,
            camp_id: 0,
            speaker_id: 0,
            title: String::new(),
            abstract_text: String::new(),
            level: 0,
            speaker: None,
        };
        self.apply_to(&mut talk);
        talk
    }

    pub fn apply_to(&self, talk: &mut Talk) {
        talk.title = self.title.clone();
        talk.abstract_text = self.abstract_text.clone();
        talk.level = self.level;
    }
}

impl From<&Speaker> for SpeakerModel {
    fn from(s: &Speaker) -> Self {
        SpeakerModel {
            speaker_id: s.speaker_id,
            first_name: s.first_name.clone(),
            last_name: s.last_name.clone(),
            middle_name: s.middle_name.clone(),
            company: s.company.clone(),
            company_url: s.company_url.clone(),
            blog_url: s.blog_url.clone(),
            twitter: s.twitter.clone(),
            git_hub: s.git_hub.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn camp_model() -> CampModel {
        CampModel {
            name: "Rust Camp".into(),
            moniker: "RUST24".into(),
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            length: 2,
            venue: Some("Hall A".into()),
            location_address1: Some("1 Main St".into()),
            location_address2: None,
            location_address3: None,
            location_city_town: Some("Atlanta".into()),
            location_state_province: Some("GA".into()),
            location_postal_code: Some("30303".into()),
            location_country: Some("USA".into()),
            talks: None,
        }
    }

    #[test]
    fn camp_fields_survive_round_trip() {
        let model = camp_model();
        let back = CampModel::from(&model.to_entity());
        assert_eq!(back, model);
    }

    #[test]
    fn camp_apply_keeps_key_and_talks() {
        let mut camp = camp_model().to_entity();
        camp.camp_id = 7;
        camp.talks = Some(Vec::new());
        let mut update = camp_model();
        update.name = "Renamed".into();
        update.venue = None;
        update.apply_to(&mut camp);
        assert_eq!(camp.camp_id, 7);
        assert_eq!(camp.name, "Renamed");
        assert_eq!(camp.location.venue, None);
        assert_eq!(camp.talks, Some(Vec::new()));
    }

    #[test]
    fn talk_fields_survive_round_trip() {
        let model = TalkModel {
            talk_id: 0,
            title: "Lifetimes".into(),
            abstract_text: "A gentle tour of lifetime elision".into(),
            level: 300,
            speaker: None,
        };
        let back = TalkModel::from(&model.to_entity());
        assert_eq!(back, model);
    }

    #[test]
    fn talk_apply_leaves_associations() {
        let speaker = Speaker {
            speaker_id: 3,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        let mut talk = Talk {
            talk_id: 11,
            camp_id: 1,
            speaker_id: 3,
            title: "Old".into(),
            abstract_text: "Old abstract text here".into(),
            level: 100,
            speaker: Some(speaker.clone()),
        };
        let update = TalkModel {
            talk_id: 99,
            title: "New".into(),
            abstract_text: "New abstract text here".into(),
            level: 200,
            speaker: Some(SpeakerModel { speaker_id: 42, ..Default::default() }),
        };
        update.apply_to(&mut talk);
        assert_eq!(talk.talk_id, 11);
        assert_eq!(talk.speaker_id, 3);
        assert_eq!(talk.speaker, Some(speaker));
        assert_eq!(talk.title, "New");
        assert_eq!(talk.level, 200);
    }
}
