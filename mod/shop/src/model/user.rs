use serde::{Deserialize, Serialize};

/// User — a customer identified by phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Phone number. Unique; the login identity.
    pub phone: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One-time login code, stored until used or expired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OtpCode {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub phone: String,

    /// 6-digit numeric code.
    pub code: String,

    /// RFC 3339 expiry timestamp.
    pub expires_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_json_roundtrip() {
        let u = User {
            id: "u001".into(),
            phone: "+15550001111".into(),
            name: "Valued Customer".into(),
            email: None,
            avatar_url: None,
            created_at: None,
        };
        let json = serde_json::to_string(&u).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(u, back);
    }
}
