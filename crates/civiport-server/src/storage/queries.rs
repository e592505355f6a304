//! Database queries for the CiviPort backend.

use civiport_core::db::{DatabaseError, unix_timestamp};

use super::db::PortalDatabase;
use super::models::{Admin, Complaint, OtpCode};

/// How long a one-time code stays valid, in seconds.
pub const OTP_TTL_SECS: i64 = 600;

/// Parameters for inserting a complaint.
///
/// Every field is optional; the public form guarantees nothing.
#[derive(Debug, Default)]
pub struct NewComplaint<'a> {
    pub fullname: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub complaint_type: Option<&'a str>,
    pub description: Option<&'a str>,
    pub urgency: Option<&'a str>,
    pub latitude: Option<&'a str>,
    pub longitude: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

impl PortalDatabase {
    // =========================================================================
    // Administrator queries
    // =========================================================================

    /// Create an administrator. Used by startup seeding only; the HTTP
    /// surface never creates or mutates administrators.
    pub async fn create_admin(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Admin, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO admins (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_admin(id).await
    }

    /// Get an administrator by ID.
    pub async fn get_admin(&self, id: &str) -> Result<Admin, DatabaseError> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Admin {id}")))
    }

    /// Get an administrator by username.
    pub async fn get_admin_by_username(&self, username: &str) -> Result<Admin, DatabaseError> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Admin with username {username}")))
    }

    // =========================================================================
    // One-time code queries
    // =========================================================================

    /// Store a freshly issued one-time code.
    pub async fn create_otp(&self, email: &str, code: &str) -> Result<OtpCode, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query("INSERT INTO otp_codes (email, code, issued_at) VALUES (?, ?, ?)")
            .bind(email)
            .bind(code)
            .bind(now)
            .execute(self.pool())
            .await?;

        let id = result.last_insert_rowid();
        sqlx::query_as::<_, OtpCode>("SELECT * FROM otp_codes WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// The most recently issued code for an address within the validity
    /// window. Older codes are never considered once a newer one exists,
    /// consumed or not.
    pub async fn latest_otp(&self, email: &str) -> Result<Option<OtpCode>, DatabaseError> {
        let cutoff = unix_timestamp() - OTP_TTL_SECS;

        let code = sqlx::query_as::<_, OtpCode>(
            "SELECT * FROM otp_codes WHERE email = ? AND issued_at > ? ORDER BY id DESC LIMIT 1",
        )
        .bind(email)
        .bind(cutoff)
        .fetch_optional(self.pool())
        .await?;

        Ok(code)
    }

    /// Mark a code consumed after successful verification. The row is kept.
    pub async fn consume_otp(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE otp_codes SET consumed = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // =========================================================================
    // Complaint queries
    // =========================================================================

    /// Insert a new complaint. Status always starts as `pending`, whatever
    /// the caller supplied.
    pub async fn create_complaint(
        &self,
        params: &NewComplaint<'_>,
    ) -> Result<Complaint, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO complaints (fullname, phone, complaint_type, description, urgency, \
             latitude, longitude, created_at, image_url) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(params.fullname)
        .bind(params.phone)
        .bind(params.complaint_type)
        .bind(params.description)
        .bind(params.urgency)
        .bind(params.latitude)
        .bind(params.longitude)
        .bind(now)
        .bind(params.image_url)
        .execute(self.pool())
        .await?;

        self.get_complaint(result.last_insert_rowid()).await
    }

    /// Get a complaint by ID.
    pub async fn get_complaint(&self, id: i64) -> Result<Complaint, DatabaseError> {
        sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Complaint {id}")))
    }

    /// All complaints, newest first. The id tiebreak keeps ordering stable
    /// for rows created within the same second.
    pub async fn list_complaints(&self) -> Result<Vec<Complaint>, DatabaseError> {
        let complaints = sqlx::query_as::<_, Complaint>(
            "SELECT * FROM complaints ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(complaints)
    }

    /// Atomically set the status of an existing complaint.
    ///
    /// The existence check and the write are one statement, so a concurrent
    /// update cannot interleave between them; concurrent writers are
    /// last-writer-wins. Returns `NotFound` when no row has the given id.
    pub async fn update_complaint_status(
        &self,
        id: i64,
        status: &str,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE complaints SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Complaint {id}")));
        }

        Ok(())
    }
}
