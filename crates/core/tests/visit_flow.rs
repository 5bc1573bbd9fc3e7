use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gatepass_core::{
    gate, qr, Database, Error, InvitationDetails, InvitationRepository, InvitationStatus,
    SessionStore, UserRole, PAYLOAD_TYPE,
};
use tempfile::tempdir;

fn ahmed() -> InvitationDetails {
    InvitationDetails {
        visitor_full_name: "Ahmed".to_string(),
        visitor_title: String::new(),
        visitor_email: None,
        visitor_phone: None,
        number_of_companions: 0,
        visit_date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
        visit_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        reason_for_visit: "Meeting".to_string(),
        floor_number: 2,
        office_number: "201".to_string(),
        inviting_directorate: "IT".to_string(),
    }
}

fn today() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-10-16 09:00", "%Y-%m-%d %H:%M").unwrap()
}

#[test]
fn manager_invites_and_guard_checks_in() {
    let db = Database::open_in_memory().unwrap();
    let mut sessions = SessionStore::load(&db).unwrap();
    let mut repo = InvitationRepository::load(&db).unwrap();

    sessions.login(UserRole::Manager, Some("Noura".into())).unwrap();
    let invitation = repo.create(ahmed()).unwrap();
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert!(!invitation.is_expired_at(today()));

    let payload = qr::encode(&invitation.id);
    let decoded = qr::decode(&payload.to_text()).unwrap();
    assert_eq!(decoded.kind, PAYLOAD_TYPE);
    assert_eq!(decoded.invitation_id(), invitation.id);

    sessions.logout().unwrap();
    sessions.login(UserRole::GateGuard, None).unwrap();

    let found = repo.find(&decoded.invitation_id).unwrap();
    assert_eq!(found, &invitation);

    repo.update_status(&decoded.invitation_id, InvitationStatus::CheckedIn)
        .unwrap();
    assert_eq!(
        repo.get(&invitation.id).unwrap().status,
        InvitationStatus::CheckedIn
    );
    assert!(repo
        .pending_at(today())
        .iter()
        .all(|i| i.id != invitation.id));
}

#[test]
fn gate_flow_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gatepass.db");

    let text = {
        let db = Database::open(&path).unwrap();
        let mut repo = InvitationRepository::load(&db).unwrap();
        let invitation = repo.create(ahmed()).unwrap();
        qr::encode(&invitation.id).to_text()
    };

    let db = Database::open(&path).unwrap();
    let mut repo = InvitationRepository::load(&db).unwrap();

    let scanned = gate::scan_at(&repo, &text, today()).unwrap();
    assert!(scanned.can_check_in());
    gate::check_in_at(&mut repo, scanned.invitation.id.as_str(), today()).unwrap();

    let reopened = InvitationRepository::load(&db).unwrap();
    assert!(reopened
        .get(&scanned.invitation.id)
        .unwrap()
        .is_checked_in());
}

#[test]
fn scanning_garbage_never_reaches_lookup() {
    let db = Database::open_in_memory().unwrap();
    let repo = InvitationRepository::load(&db).unwrap();

    for text in ["{}", r#"{"type":"WRONG"}"#, r#"{"type":"VISITOR_INVITE_V1","invitationId":123}"#] {
        assert!(matches!(
            gate::scan_at(&repo, text, today()),
            Err(Error::InvalidPayload(_))
        ));
    }
}
