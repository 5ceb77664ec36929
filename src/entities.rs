//! Persisted shapes of camps, talks and speakers.

use chrono::NaiveDate;

/// Where a camp is held. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub venue: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city_town: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Camp {
    /// Assigned by the store; 0 until the first commit.
    pub camp_id: i32,
    pub moniker: String,
    pub name: String,
    pub event_date: NaiveDate,
    pub length: i32,
    pub location: Location,
    /// `None` when talks were not eagerly loaded.
    pub talks: Option<Vec<Talk>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Talk {
    pub talk_id: i32,
    pub camp_id: i32,
    pub speaker_id: i32,
    pub title: String,
    pub abstract_text: String,
    pub level: i32,
    /// `None` when the speaker was not eagerly loaded.
    pub speaker: Option<Speaker>,
}

impl Talk {
    pub fn attach_camp(&mut self, camp: &Camp) {
        self.camp_id = camp.camp_id;
    }

    pub fn attach_speaker(&mut self, speaker: Speaker) {
        self.speaker_id = speaker.speaker_id;
        self.speaker = Some(speaker);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Speaker {
    pub speaker_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub blog_url: Option<String>,
    pub twitter: Option<String>,
    pub git_hub: Option<String>,
}

/// Anything the unit of work can stage for writing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    Camp(Camp),
    Talk(Talk),
}

impl Entity {
    pub fn as_camp(&self) -> Option<&Camp> {
        match self {
            Entity::Camp(c) => Some(c),
            Entity::Talk(_) => None,
        }
    }

    pub fn as_talk(&self) -> Option<&Talk> {
        match self {
            Entity::Talk(t) => Some(t),
            Entity::Camp(_) => None,
        }
    }
}

impl From<Camp> for Entity {
    fn from(camp: Camp) -> Self {
        Entity::Camp(camp)
    }
}

impl From<Talk> for Entity {
    fn from(talk: Talk) -> Self {
        Entity::Talk(talk)
    }
}
