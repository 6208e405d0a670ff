//! Entity models for the console API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account role, gating access to parts of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// An operator account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
}

/// Create/update payload for an operator account.
///
/// `password` is omitted from the wire when absent, so updates can leave
/// the stored password untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            role: Role::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// A registered voter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub reference_number: String,
    pub region_id: i64,
    pub district_id: i64,
    #[serde(default)]
    pub vote_center_id: Option<i64>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub registration_date: NaiveDate,
}

/// Create/update payload for a voter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDraft {
    pub full_name: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub reference_number: String,
    pub region_id: i64,
    pub district_id: i64,
    #[serde(default)]
    pub vote_center_id: Option<i64>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub registration_date: NaiveDate,
}

/// Top-level administrative region (dropdown data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: i64,
    pub name: String,
}

/// District within a region (dropdown data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: i64,
    pub name: String,
    pub region_id: i64,
}

/// Vote center within a district (dropdown data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCenter {
    pub id: i64,
    pub name: String,
    pub district_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("admin"));
        let role: Role = serde_json::from_value(json!("user")).unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn user_decodes_from_camel_case() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "username": "clerk01",
            "role": "user",
            "isActive": true,
        }))
        .unwrap();
        assert_eq!(user.id, 7);
        assert!(user.is_active);
    }

    #[test]
    fn user_draft_omits_absent_password() {
        let draft = UserDraft {
            username: "clerk01".to_string(),
            password: None,
            role: Role::User,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("password").is_none());
    }

    #[test]
    fn voter_decodes_with_optional_fields_missing() {
        let voter: Voter = serde_json::from_value(json!({
            "id": 12,
            "fullName": "Amina Yusuf",
            "referenceNumber": "REF-0012",
            "regionId": 1,
            "districtId": 4,
            "registrationDate": "2024-05-20",
        }))
        .unwrap();
        assert_eq!(voter.full_name, "Amina Yusuf");
        assert!(voter.dob.is_none());
        assert!(voter.vote_center_id.is_none());
    }

    #[test]
    fn gender_uses_capitalized_wire_names() {
        assert_eq!(serde_json::to_value(Gender::Male).unwrap(), json!("Male"));
        let gender: Gender = serde_json::from_value(json!("Female")).unwrap();
        assert_eq!(gender, Gender::Female);
    }
}
