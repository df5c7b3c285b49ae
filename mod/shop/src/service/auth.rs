use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crustops_core::{new_id, ServiceError};
use crustops_sql::Value;

use crate::model::{OtpCode, User};

use super::ShopService;

impl ShopService {
    /// Issue a one-time login code and send it to `phone`.
    ///
    /// Codes are single-use and expire after `config.otp_ttl_secs`.
    /// Unlike order-status notifications, a send failure here is fatal:
    /// without the SMS the user cannot log in.
    pub fn send_otp(&self, phone: &str) -> Result<(), ServiceError> {
        if phone.trim().is_empty() {
            return Err(ServiceError::Validation("phone number is required".into()));
        }

        let code = format!("{}", rand::thread_rng().gen_range(100000..1000000));
        let expires_at = (Utc::now() + Duration::seconds(self.config.otp_ttl_secs)).to_rfc3339();

        let id = new_id();
        let now = Self::now();
        let record = OtpCode {
            id: id.clone(),
            phone: phone.to_string(),
            code: code.clone(),
            expires_at,
            created_at: Some(now.clone()),
        };
        self.insert_record("otp_codes", &id, &record, &[
            ("phone", phone.into()),
            ("code", code.as_str().into()),
            ("expires_at", record.expires_at.as_str().into()),
            ("create_at", Value::Text(now)),
        ])?;

        self.notifier
            .send(phone, &format!("Your CrustOps verification code is {}", code))
    }

    /// Verify a one-time code, consuming it, and log the user in. An
    /// unknown phone number becomes a fresh account.
    pub fn verify_otp(&self, phone: &str, code: &str) -> Result<User, ServiceError> {
        let stored = self
            .list_records::<OtpCode>(
                "otp_codes",
                &[("phone", phone.into()), ("code", code.into())],
                "create_at DESC",
                1,
                0,
            )?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Unauthorized("Invalid or expired code".into()))?;

        let expires = DateTime::parse_from_rfc3339(&stored.expires_at)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        if expires < Utc::now() {
            return Err(ServiceError::Unauthorized("Invalid or expired code".into()));
        }

        // Single-use.
        self.delete_record("otp_codes", &stored.id)?;

        match self.get_user_by_phone(phone)? {
            Some(user) => Ok(user),
            None => self.create_user(phone),
        }
    }

    fn create_user(&self, phone: &str) -> Result<User, ServiceError> {
        let id = new_id();
        let now = Self::now();
        let user = User {
            id: id.clone(),
            phone: phone.to_string(),
            name: "Valued Customer".into(),
            email: None,
            avatar_url: None,
            created_at: Some(now.clone()),
        };
        self.insert_record("users", &id, &user, &[
            ("phone", phone.into()),
            ("create_at", Value::Text(now)),
        ])?;
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        self.get_record("users", id)
    }

    pub fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .list_records::<User>("users", &[("phone", phone.into())], "create_at ASC", 1, 0)?
            .into_iter()
            .next())
    }

    /// Update profile fields; phone stays the login identity but is
    /// editable like the rest.
    pub fn update_user(&self, id: &str, patch: serde_json::Value) -> Result<User, ServiceError> {
        let current: User = self.get_record("users", id)?;
        let updated: User = Self::apply_patch(&current, patch)?;
        self.update_record("users", id, &updated, &[
            ("phone", updated.phone.as_str().into()),
        ])?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crustops_core::ServiceError;

    use crate::notify::testing::RecordingNotifier;
    use crate::service::testing::{test_service, test_service_with};
    use crate::service::ShopConfig;

    const PHONE: &str = "+15550001111";

    fn sent_code(notifier: &RecordingNotifier) -> String {
        let sent = notifier.sent.lock().unwrap();
        let (to, message) = sent.last().cloned().unwrap();
        assert_eq!(to, PHONE);
        message
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect()
    }

    #[test]
    fn otp_login_creates_and_reuses_user() {
        let (svc, notifier) = test_service();

        svc.send_otp(PHONE).unwrap();
        let code = sent_code(&notifier);
        assert_eq!(code.len(), 6);

        let user = svc.verify_otp(PHONE, &code).unwrap();
        assert_eq!(user.name, "Valued Customer");

        // Second login returns the same account.
        svc.send_otp(PHONE).unwrap();
        let code = sent_code(&notifier);
        let again = svc.verify_otp(PHONE, &code).unwrap();
        assert_eq!(again.id, user.id);
    }

    #[test]
    fn wrong_code_is_rejected() {
        let (svc, _) = test_service();
        svc.send_otp(PHONE).unwrap();
        let err = svc.verify_otp(PHONE, "000000").unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn codes_are_single_use() {
        let (svc, notifier) = test_service();
        svc.send_otp(PHONE).unwrap();
        let code = sent_code(&notifier);
        svc.verify_otp(PHONE, &code).unwrap();
        let err = svc.verify_otp(PHONE, &code).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn expired_codes_are_rejected() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = test_service_with(
            notifier.clone(),
            ShopConfig { otp_ttl_secs: -1 },
        );
        svc.send_otp(PHONE).unwrap();
        let code = sent_code(&notifier);
        let err = svc.verify_otp(PHONE, &code).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn profile_update_keeps_id() {
        let (svc, notifier) = test_service();
        svc.send_otp(PHONE).unwrap();
        let code = sent_code(&notifier);
        let user = svc.verify_otp(PHONE, &code).unwrap();

        let updated = svc
            .update_user(&user.id, serde_json::json!({"name": "Ada", "id": "hijack"}))
            .unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.name, "Ada");
        assert_eq!(svc.get_user(&user.id).unwrap().name, "Ada");
    }
}
