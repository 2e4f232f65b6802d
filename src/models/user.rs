use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile returned by `/auth/me` and `/auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    pub created_at: String,
}

fn default_role() -> String {
    "user".to_string()
}

/// The signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: String,
    pub is_active: Option<bool>,
    pub email_verified: Option<bool>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
}

impl From<UserProfile> for User {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            username: profile.username,
            full_name: profile.full_name,
            role: profile.role,
            created_at: profile.created_at,
            is_active: profile.is_active,
            email_verified: profile.email_verified,
            phone: profile.phone,
            timezone: profile.timezone,
        }
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            timezone: user.timezone.clone(),
            role: user.role.clone(),
            email_verified: user.email_verified,
            is_active: user.is_active,
            created_at: user.created_at.clone(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.full_name {
            Some(name) => writeln!(f, "{} <{}>", name, self.email)?,
            None => writeln!(f, "{}", self.email)?,
        }
        if let Some(username) = &self.username {
            writeln!(f, "Username: {}", username)?;
        }
        writeln!(f, "Role: {}", self.role)?;
        if let Some(verified) = self.email_verified {
            writeln!(f, "Email verified: {}", if verified { "yes" } else { "no" })?;
        }
        if let Some(tz) = &self.timezone {
            writeln!(f, "Timezone: {}", tz)?;
        }
        writeln!(f, "Member since: {}", crate::dates::format_month_year(&self.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_to_user() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "user-1",
            "username": "milton",
            "email": "milton@example.com",
            "full_name": "Milton Ruiz",
            "phone": null,
            "timezone": "America/Bogota",
            "role": "user",
            "email_verified": true,
            "is_active": true,
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        let user = User::from(profile.clone());
        assert_eq!(user.full_name.as_deref(), Some("Milton Ruiz"));
        assert_eq!(user.email_verified, Some(true));
        assert_eq!(UserProfile::from(&user), profile);

        let view = serde_json::to_value(&user).unwrap();
        assert_eq!(view["fullName"], "Milton Ruiz");
        assert_eq!(view["emailVerified"], true);
    }

    #[test]
    fn test_minimal_profile() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "user-2",
            "email": "a@b.co",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(profile.role, "user");
        assert!(profile.username.is_none());
    }
}
