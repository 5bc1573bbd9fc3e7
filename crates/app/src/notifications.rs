//! Visitor notification dispatch
//!
//! Delivery is simulated: messages are rendered, logged, and acknowledged
//! after the configured delay. Nothing leaves the machine.

use std::time::Duration;

use chrono::Local;
use gatepass_core::notify::{
    self, EmailMessage, NotificationKind, NotificationSettings, SmsMessage, TemplateData,
};
use gatepass_core::validation::{is_valid_email, is_valid_phone};
use gatepass_core::Invitation;
use tracing::{debug, info, warn};

use crate::config::AppConfig;

/// What was delivered for one notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub email_sent: bool,
    pub sms_sent: bool,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    settings: NotificationSettings,
    organization_name: String,
    delivery_delay: Duration,
}

impl NotificationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            settings: config.notifications.settings(),
            organization_name: config.organization_name.clone(),
            delivery_delay: config.notifications.delivery_delay(),
        }
    }

    pub fn settings(&self) -> NotificationSettings {
        self.settings
    }

    pub async fn send_email(&self, to: &str, message: &EmailMessage) -> bool {
        tokio::time::sleep(self.delivery_delay).await;
        info!(to, subject = %message.subject, "Email sent");
        debug!(body = %message.body, "Email body");
        true
    }

    pub async fn send_sms(&self, to: &str, message: &SmsMessage) -> bool {
        tokio::time::sleep(self.delivery_delay / 2).await;
        info!(to, text = %message.text, "SMS sent");
        true
    }

    /// Notify the visitor on every enabled channel they have a valid contact for
    pub async fn notify(&self, kind: NotificationKind, invitation: &Invitation) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        if !self.settings.allows(kind) {
            debug!(?kind, "Notification kind disabled");
            return report;
        }

        let mut data = TemplateData::for_invitation(invitation, &self.organization_name);
        if kind == NotificationKind::CheckIn {
            data = data.with_check_in(Local::now());
        }

        if self.settings.email {
            if let Some(email) = invitation.visitor_email.as_deref() {
                if is_valid_email(email) {
                    let message = notify::render_email(kind, &data);
                    report.email_sent = self.send_email(email, &message).await;
                } else {
                    warn!(invitation_id = %invitation.id, "Skipping invalid visitor email");
                }
            }
        }

        if self.settings.sms {
            if let Some(phone) = invitation.visitor_phone.as_deref() {
                if is_valid_phone(phone) {
                    let message = notify::render_sms(kind, &data);
                    report.sms_sent = self.send_sms(phone, &message).await;
                } else {
                    warn!(invitation_id = %invitation.id, "Skipping invalid visitor phone");
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use gatepass_core::InvitationDetails;

    fn service(configure: impl FnOnce(&mut AppConfig)) -> NotificationService {
        let mut config = AppConfig::default();
        config.notifications.delivery_delay_ms = 0;
        configure(&mut config);
        NotificationService::new(&config)
    }

    fn invitation(email: Option<&str>, phone: Option<&str>) -> Invitation {
        Invitation::new(InvitationDetails {
            visitor_full_name: "Ahmed".to_string(),
            visitor_title: "Engineer".to_string(),
            visitor_email: email.map(str::to_string),
            visitor_phone: phone.map(str::to_string),
            number_of_companions: 0,
            visit_date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            visit_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            reason_for_visit: "Meeting".to_string(),
            floor_number: 2,
            office_number: "201".to_string(),
            inviting_directorate: "IT".to_string(),
        })
    }

    #[tokio::test]
    async fn test_sends_on_both_channels() {
        let report = service(|_| {})
            .notify(
                NotificationKind::Invitation,
                &invitation(Some("ahmed@example.sa"), Some("0501234567")),
            )
            .await;
        assert_eq!(
            report,
            DeliveryReport {
                email_sent: true,
                sms_sent: true,
            }
        );
    }

    #[tokio::test]
    async fn test_skips_invalid_and_missing_contacts() {
        let report = service(|_| {})
            .notify(NotificationKind::Reminder, &invitation(Some("nope"), None))
            .await;
        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn test_respects_settings() {
        let inv = invitation(Some("ahmed@example.sa"), Some("0501234567"));

        let no_check_in = service(|c| c.notifications.check_in = false);
        assert_eq!(
            no_check_in.notify(NotificationKind::CheckIn, &inv).await,
            DeliveryReport::default()
        );

        let email_only = service(|c| c.notifications.sms = false);
        let report = email_only.notify(NotificationKind::CheckIn, &inv).await;
        assert!(report.email_sent);
        assert!(!report.sms_sent);
    }
}
