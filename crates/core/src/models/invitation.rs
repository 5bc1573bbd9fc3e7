//! Invitation model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::id::InvitationId;

/// Stored lifecycle state of an invitation.
///
/// Expiry is not a state: it is derived from the visit date and time on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    CheckedIn,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::CheckedIn => "CHECKED_IN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "Pending",
            InvitationStatus::CheckedIn => "Checked in",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(InvitationStatus::Pending),
            "CHECKED_IN" => Ok(InvitationStatus::CheckedIn),
            other => Err(Error::Validation(format!("unknown invitation status '{other}'"))),
        }
    }
}

/// Visitor and visit fields supplied by the manager when creating an invitation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDetails {
    pub visitor_full_name: String,
    pub visitor_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    pub number_of_companions: u32,
    pub visit_date: NaiveDate,
    #[serde(with = "visit_time")]
    pub visit_time: NaiveTime,
    pub reason_for_visit: String,
    pub floor_number: u32,
    pub office_number: String,
    pub inviting_directorate: String,
}

/// One visitor's authorized visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InvitationId,
    pub visitor_full_name: String,
    pub visitor_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    pub number_of_companions: u32,
    pub visit_date: NaiveDate,
    #[serde(with = "visit_time")]
    pub visit_time: NaiveTime,
    pub reason_for_visit: String,
    pub floor_number: u32,
    pub office_number: String,
    pub inviting_directorate: String,
    pub created_at: DateTime<Utc>,
    pub status: InvitationStatus,
}

impl Invitation {
    /// Build a fresh pending invitation with a generated identifier
    pub fn new(details: InvitationDetails) -> Self {
        Self {
            id: InvitationId::generate(),
            visitor_full_name: details.visitor_full_name,
            visitor_title: details.visitor_title,
            visitor_email: details.visitor_email,
            visitor_phone: details.visitor_phone,
            number_of_companions: details.number_of_companions,
            visit_date: details.visit_date,
            visit_time: details.visit_time,
            reason_for_visit: details.reason_for_visit,
            floor_number: details.floor_number,
            office_number: details.office_number,
            inviting_directorate: details.inviting_directorate,
            created_at: Utc::now(),
            status: InvitationStatus::Pending,
        }
    }

    /// The scheduled visit as a local date-time
    pub fn visit_datetime(&self) -> NaiveDateTime {
        self.visit_date.and_time(self.visit_time)
    }

    /// True once the scheduled visit is strictly before `now`
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        self.visit_datetime() < now
    }

    /// Expiry against the local wall clock
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Local::now().naive_local())
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    pub fn is_checked_in(&self) -> bool {
        self.status == InvitationStatus::CheckedIn
    }

    /// Only pending, unexpired invitations may be checked in
    pub fn can_check_in_at(&self, now: NaiveDateTime) -> bool {
        self.is_pending() && !self.is_expired_at(now)
    }

    pub fn can_check_in(&self) -> bool {
        self.can_check_in_at(Local::now().naive_local())
    }

    /// Total headcount arriving with this invitation
    pub fn party_size(&self) -> u32 {
        self.number_of_companions.saturating_add(1)
    }

    /// Current visitor and visit fields
    pub fn details(&self) -> InvitationDetails {
        InvitationDetails {
            visitor_full_name: self.visitor_full_name.clone(),
            visitor_title: self.visitor_title.clone(),
            visitor_email: self.visitor_email.clone(),
            visitor_phone: self.visitor_phone.clone(),
            number_of_companions: self.number_of_companions,
            visit_date: self.visit_date,
            visit_time: self.visit_time,
            reason_for_visit: self.reason_for_visit.clone(),
            floor_number: self.floor_number,
            office_number: self.office_number.clone(),
            inviting_directorate: self.inviting_directorate.clone(),
        }
    }

    /// Merge the present fields of `patch`. Identifier and creation time never change.
    pub fn apply(&mut self, patch: InvitationPatch) {
        if let Some(v) = patch.visitor_full_name {
            self.visitor_full_name = v;
        }
        if let Some(v) = patch.visitor_title {
            self.visitor_title = v;
        }
        if let Some(v) = patch.visitor_email {
            self.visitor_email = v;
        }
        if let Some(v) = patch.visitor_phone {
            self.visitor_phone = v;
        }
        if let Some(v) = patch.number_of_companions {
            self.number_of_companions = v;
        }
        if let Some(v) = patch.visit_date {
            self.visit_date = v;
        }
        if let Some(v) = patch.visit_time {
            self.visit_time = v;
        }
        if let Some(v) = patch.reason_for_visit {
            self.reason_for_visit = v;
        }
        if let Some(v) = patch.floor_number {
            self.floor_number = v;
        }
        if let Some(v) = patch.office_number {
            self.office_number = v;
        }
        if let Some(v) = patch.inviting_directorate {
            self.inviting_directorate = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }
}

/// Partial update of an invitation's mutable fields.
///
/// `None` leaves a field untouched. The optional contact fields take
/// `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationPatch {
    pub visitor_full_name: Option<String>,
    pub visitor_title: Option<String>,
    pub visitor_email: Option<Option<String>>,
    pub visitor_phone: Option<Option<String>>,
    pub number_of_companions: Option<u32>,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<NaiveTime>,
    pub reason_for_visit: Option<String>,
    pub floor_number: Option<u32>,
    pub office_number: Option<String>,
    pub inviting_directorate: Option<String>,
    pub status: Option<InvitationStatus>,
}

impl InvitationPatch {
    pub fn with_status(mut self, status: InvitationStatus) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<InvitationDetails> for InvitationPatch {
    fn from(details: InvitationDetails) -> Self {
        Self {
            visitor_full_name: Some(details.visitor_full_name),
            visitor_title: Some(details.visitor_title),
            visitor_email: Some(details.visitor_email),
            visitor_phone: Some(details.visitor_phone),
            number_of_companions: Some(details.number_of_companions),
            visit_date: Some(details.visit_date),
            visit_time: Some(details.visit_time),
            reason_for_visit: Some(details.reason_for_visit),
            floor_number: Some(details.floor_number),
            office_number: Some(details.office_number),
            inviting_directorate: Some(details.inviting_directorate),
            status: None,
        }
    }
}

/// `HH:mm` wire format for visit times. Times with seconds are read and
/// written as `HH:mm:ss` so they keep their expiry boundary.
pub mod visit_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";
    const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 {
            FORMAT
        } else {
            FORMAT_WITH_SECONDS
        };
        serializer.collect_str(&time.format(format))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| de::Error::custom(format!("invalid visit time '{s}'")))
    }

    pub fn parse(s: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, FORMAT_WITH_SECONDS))
            .ok()
    }
}
