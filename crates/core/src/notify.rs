//! Visitor notification templates
//!
//! Rendering only. Delivery belongs to the application shell.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::Invitation;

/// Events a visitor can be notified about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Invitation,
    CheckIn,
    Reminder,
}

/// Which channels and events are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email: bool,
    pub sms: bool,
    pub check_in: bool,
    pub reminder: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            sms: true,
            check_in: true,
            reminder: true,
        }
    }
}

impl NotificationSettings {
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Invitation => true,
            NotificationKind::CheckIn => self.check_in,
            NotificationKind::Reminder => self.reminder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub text: String,
}

const INVITATION_SUBJECT: &str = "Visit invitation - {visitorName}";
const INVITATION_BODY: &str = "\
Dear {visitorName},

You are invited to visit {organizationName} on {visitDate} at {visitTime}.

Visit details:
- Name: {visitorName}
- Title: {visitorTitle}
- Date: {visitDate}
- Time: {visitTime}
- Floor: {floorNumber}
- Office: {officeNumber}
- Directorate: {directorate}
- Reason: {reasonForVisit}

Please bring the attached QR code to speed up check-in at the gate.

Reception team
{organizationName}";

const CHECK_IN_SUBJECT: &str = "Checked in - {visitorName}";
const CHECK_IN_BODY: &str = "\
Dear {visitorName},

This confirms you were checked in at {organizationName} on {checkInDate} at {checkInTime}.

We wish you a pleasant visit.

{organizationName}";

const REMINDER_SUBJECT: &str = "Visit reminder - {visitorName}";
const REMINDER_BODY: &str = "\
Dear {visitorName},

A reminder of your visit to {organizationName} on {visitDate} at {visitTime}.

Please remember to bring your QR code.

{organizationName}";

const INVITATION_SMS: &str = "{organizationName}: visit on {visitDate} {visitTime}. Code: {shortCode}";
const CHECK_IN_SMS: &str = "{organizationName}: thank you for checking in, {visitorName}, at {checkInTime}";
const REMINDER_SMS: &str = "{organizationName}: reminder of your visit on {visitDate} {visitTime}";

/// Placeholder values for one invitation
pub struct TemplateData {
    values: HashMap<&'static str, String>,
}

impl TemplateData {
    pub fn for_invitation(invitation: &Invitation, organization_name: &str) -> Self {
        let id = invitation.id.as_str();
        let short_code: String = {
            let chars: Vec<char> = id.chars().collect();
            chars[chars.len().saturating_sub(6)..].iter().collect()
        };

        let values = HashMap::from([
            ("visitorName", invitation.visitor_full_name.clone()),
            ("visitorTitle", invitation.visitor_title.clone()),
            ("visitDate", invitation.visit_date.format("%Y-%m-%d").to_string()),
            ("visitTime", invitation.visit_time.format("%H:%M").to_string()),
            ("floorNumber", invitation.floor_number.to_string()),
            ("officeNumber", invitation.office_number.clone()),
            ("directorate", invitation.inviting_directorate.clone()),
            ("reasonForVisit", invitation.reason_for_visit.clone()),
            ("organizationName", organization_name.to_string()),
            ("shortCode", short_code),
        ]);

        Self { values }
    }

    /// Add the check-in moment
    pub fn with_check_in(mut self, at: DateTime<Local>) -> Self {
        self.values
            .insert("checkInDate", at.format("%Y-%m-%d").to_string());
        self.values
            .insert("checkInTime", at.format("%H:%M").to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Replace `{key}` placeholders. Unknown placeholders are left as written.
pub fn populate(template: &str, data: &TemplateData) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match data.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_email(kind: NotificationKind, data: &TemplateData) -> EmailMessage {
    let (subject, body) = match kind {
        NotificationKind::Invitation => (INVITATION_SUBJECT, INVITATION_BODY),
        NotificationKind::CheckIn => (CHECK_IN_SUBJECT, CHECK_IN_BODY),
        NotificationKind::Reminder => (REMINDER_SUBJECT, REMINDER_BODY),
    };
    EmailMessage {
        subject: populate(subject, data),
        body: populate(body, data),
    }
}

pub fn render_sms(kind: NotificationKind, data: &TemplateData) -> SmsMessage {
    let template = match kind {
        NotificationKind::Invitation => INVITATION_SMS,
        NotificationKind::CheckIn => CHECK_IN_SMS,
        NotificationKind::Reminder => REMINDER_SMS,
    };
    SmsMessage {
        text: populate(template, data),
    }
}
