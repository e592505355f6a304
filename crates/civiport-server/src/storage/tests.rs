//! Storage layer tests for the CiviPort backend.

use civiport_core::db::unix_timestamp;

use super::db::PortalDatabase;
use super::models::is_valid_status;
use super::queries::{NewComplaint, OTP_TTL_SECS};

async fn test_db() -> PortalDatabase {
    PortalDatabase::open_in_memory().await.unwrap()
}

// === Administrator tests ===

#[tokio::test]
async fn create_and_get_admin() {
    let db = test_db().await;
    let admin = db.create_admin("a1", "admin", "hash123").await.unwrap();

    assert_eq!(admin.id, "a1");
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.password_hash, "hash123");
}

#[tokio::test]
async fn get_admin_by_username() {
    let db = test_db().await;
    db.create_admin("a1", "admin", "hash123").await.unwrap();

    let admin = db.get_admin_by_username("admin").await.unwrap();
    assert_eq!(admin.id, "a1");

    assert!(db.get_admin_by_username("nobody").await.is_err());
}

#[tokio::test]
async fn duplicate_username_rejected() {
    let db = test_db().await;
    db.create_admin("a1", "admin", "hash123").await.unwrap();

    assert!(db.create_admin("a2", "admin", "hash456").await.is_err());
}

// === One-time code tests ===

#[tokio::test]
async fn latest_otp_prefers_newest() {
    let db = test_db().await;
    db.create_otp("citizen@example.com", "111111").await.unwrap();
    db.create_otp("citizen@example.com", "222222").await.unwrap();

    let latest = db.latest_otp("citizen@example.com").await.unwrap().unwrap();
    assert_eq!(latest.code, "222222");
    assert_eq!(latest.consumed, 0);
}

#[tokio::test]
async fn latest_otp_none_for_unknown_address() {
    let db = test_db().await;
    assert!(db.latest_otp("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn expired_otp_not_returned() {
    let db = test_db().await;

    let stale = unix_timestamp() - OTP_TTL_SECS - 1;
    sqlx::query("INSERT INTO otp_codes (email, code, issued_at) VALUES (?, ?, ?)")
        .bind("citizen@example.com")
        .bind("111111")
        .bind(stale)
        .execute(db.pool())
        .await
        .unwrap();

    assert!(db.latest_otp("citizen@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn consumed_otp_stays_latest() {
    // Consumption marks the row; it does not resurrect older codes.
    let db = test_db().await;
    db.create_otp("citizen@example.com", "111111").await.unwrap();
    let newest = db.create_otp("citizen@example.com", "222222").await.unwrap();

    db.consume_otp(newest.id).await.unwrap();

    let latest = db.latest_otp("citizen@example.com").await.unwrap().unwrap();
    assert_eq!(latest.id, newest.id);
    assert_eq!(latest.consumed, 1);
}

#[tokio::test]
async fn otp_addresses_are_independent() {
    let db = test_db().await;
    db.create_otp("a@example.com", "111111").await.unwrap();
    db.create_otp("b@example.com", "222222").await.unwrap();

    let a = db.latest_otp("a@example.com").await.unwrap().unwrap();
    assert_eq!(a.code, "111111");
}

// === Complaint tests ===

#[tokio::test]
async fn create_complaint_defaults() {
    let db = test_db().await;

    let complaint = db
        .create_complaint(&NewComplaint {
            fullname: Some("A"),
            phone: Some("123"),
            complaint_type: Some("noise"),
            description: Some("loud"),
            urgency: Some("low"),
            latitude: Some("1.0"),
            longitude: Some("2.0"),
            image_url: None,
        })
        .await
        .unwrap();

    assert_eq!(complaint.status, "pending");
    assert_eq!(complaint.image_url, None);
    assert_eq!(complaint.fullname.as_deref(), Some("A"));
    assert_eq!(complaint.phone.as_deref(), Some("123"));
    assert!(complaint.created_at > 0);
}

#[tokio::test]
async fn create_complaint_all_fields_optional() {
    let db = test_db().await;

    let complaint = db.create_complaint(&NewComplaint::default()).await.unwrap();

    assert_eq!(complaint.status, "pending");
    assert_eq!(complaint.fullname, None);
    assert_eq!(complaint.description, None);
}

#[tokio::test]
async fn list_complaints_newest_first() {
    let db = test_db().await;

    let first = db
        .create_complaint(&NewComplaint {
            description: Some("first"),
            ..NewComplaint::default()
        })
        .await
        .unwrap();
    let second = db
        .create_complaint(&NewComplaint {
            description: Some("second"),
            ..NewComplaint::default()
        })
        .await
        .unwrap();

    let all = db.list_complaints().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}

#[tokio::test]
async fn update_complaint_status() {
    let db = test_db().await;
    let complaint = db.create_complaint(&NewComplaint::default()).await.unwrap();

    assert!(is_valid_status("in-progress"));
    db.update_complaint_status(complaint.id, "in-progress")
        .await
        .unwrap();

    let updated = db.get_complaint(complaint.id).await.unwrap();
    assert_eq!(updated.status, "in-progress");

    // Workflow ordering is deliberately unconstrained
    db.update_complaint_status(complaint.id, "pending")
        .await
        .unwrap();
    let reverted = db.get_complaint(complaint.id).await.unwrap();
    assert_eq!(reverted.status, "pending");
}

#[tokio::test]
async fn update_status_missing_complaint() {
    let db = test_db().await;

    let err = db.update_complaint_status(9999, "completed").await;
    assert!(err.is_err());
}

#[tokio::test]
async fn image_url_recorded_verbatim() {
    let db = test_db().await;

    let complaint = db
        .create_complaint(&NewComplaint {
            image_url: Some("http://localhost:8080/uploads/abc_pothole.jpg"),
            ..NewComplaint::default()
        })
        .await
        .unwrap();

    assert_eq!(
        complaint.image_url.as_deref(),
        Some("http://localhost:8080/uploads/abc_pothole.jpg")
    );
}
