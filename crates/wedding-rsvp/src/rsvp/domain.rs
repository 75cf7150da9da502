use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored RSVPs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RsvpId(pub String);

/// The fixed set of celebration events guests answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Mehndi,
    Ceremony,
    Reception,
}

impl Event {
    pub const ALL: [Event; 3] = [Event::Mehndi, Event::Ceremony, Event::Reception];

    pub const fn label(self) -> &'static str {
        match self {
            Event::Mehndi => "mehndi",
            Event::Ceremony => "ceremony",
            Event::Reception => "reception",
        }
    }
}

/// Parsed answer for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReply {
    pub attending: bool,
    pub guests: u16,
}

/// Raw submission payload. Field names follow the RSVP form, and the
/// attendance/count values arrive as the form's strings (`"yes"`, `"2"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpSubmission {
    #[serde(rename = "guestName")]
    pub guest_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "mehndi-attending")]
    pub mehndi_attending: Option<String>,
    #[serde(rename = "mehndi-guests")]
    pub mehndi_guests: Option<String>,
    #[serde(rename = "ceremony-attending")]
    pub ceremony_attending: Option<String>,
    #[serde(rename = "ceremony-guests")]
    pub ceremony_guests: Option<String>,
    #[serde(rename = "reception-attending")]
    pub reception_attending: Option<String>,
    #[serde(rename = "reception-guests")]
    pub reception_guests: Option<String>,
    pub dietary: Option<String>,
    pub message: Option<String>,
}

impl RsvpSubmission {
    fn raw_reply(&self, event: Event) -> (Option<&str>, Option<&str>) {
        match event {
            Event::Mehndi => (self.mehndi_attending.as_deref(), self.mehndi_guests.as_deref()),
            Event::Ceremony => (
                self.ceremony_attending.as_deref(),
                self.ceremony_guests.as_deref(),
            ),
            Event::Reception => (
                self.reception_attending.as_deref(),
                self.reception_guests.as_deref(),
            ),
        }
    }

    /// Parsed answer for one event. Anything other than `yes` means not
    /// attending. A non-attending event always carries a zero guest count;
    /// an attending event without a usable count is recorded as one guest.
    pub fn event_reply(&self, event: Event) -> EventReply {
        let (attending, guests) = self.raw_reply(event);
        let attending = attending
            .map(|value| value.trim().eq_ignore_ascii_case("yes"))
            .unwrap_or(false);
        let guests = if attending {
            guests
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(1)
        } else {
            0
        };
        EventReply { attending, guests }
    }

    pub fn event_replies(&self) -> BTreeMap<Event, EventReply> {
        Event::ALL
            .iter()
            .map(|event| (*event, self.event_reply(*event)))
            .collect()
    }

    pub fn any_event_selected(&self) -> bool {
        Event::ALL
            .iter()
            .any(|event| self.event_reply(*event).attending)
    }
}

/// Request metadata recorded alongside each stored RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMeta {
    pub source_ip: String,
    pub user_agent: String,
}

impl ClientMeta {
    pub fn unknown() -> Self {
        Self {
            source_ip: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        }
    }
}

/// A stored response. Write-once: created by the admission flow, never
/// mutated or deleted afterwards. `email` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub id: RsvpId,
    pub guest_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub events: BTreeMap<Event, EventReply>,
    pub dietary_restrictions: Option<String>,
    pub special_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub source_ip: String,
    pub user_agent: String,
}

/// Aggregate counts over all stored RSVPs, for the operator view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpSummary {
    pub total_rsvps: u64,
    pub events: BTreeMap<Event, EventSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub attending: u64,
    pub guests: u64,
}

impl RsvpSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RsvpRecord>) -> Self {
        let mut summary = Self::default();
        for event in Event::ALL {
            summary.events.insert(event, EventSummary::default());
        }

        for record in records {
            summary.total_rsvps += 1;
            for (event, reply) in &record.events {
                let entry = summary.events.entry(*event).or_default();
                if reply.attending {
                    entry.attending += 1;
                    entry.guests += u64::from(reply.guests);
                }
            }
        }

        summary
    }
}
