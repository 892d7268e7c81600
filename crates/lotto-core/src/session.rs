// ── Session ──
//
// Who is signed in on this connection. Loaded from the login response,
// cleared on logout, and handed to whoever needs it.

use serde::Serialize;

use lotto_api::models::{LoginResponse, UserInfo};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_approved: bool,
    pub commission_pct: Option<f64>,
}

impl SessionUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    pub fn is_agent(&self) -> bool {
        self.role.eq_ignore_ascii_case("agent")
    }
}

impl From<UserInfo> for SessionUser {
    fn from(u: UserInfo) -> Self {
        Self {
            id: u.id,
            role: u.role,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            is_approved: u.is_approved,
            commission_pct: u.commission_pct,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    user: Option<SessionUser>,
    device_id: Option<String>,
}

impl Session {
    pub fn load(&mut self, login: LoginResponse) {
        self.user = Some(login.user.into());
        self.device_id = login.device_id;
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.device_id = None;
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn login() -> LoginResponse {
        serde_json::from_value(serde_json::json!({
            "message": "ok",
            "deviceId": "dev-1",
            "user": {
                "id": "u-1",
                "role": "AGENT",
                "firstName": "Nur",
                "lastName": "",
                "phone": "0123456789",
                "isApproved": true
            }
        }))
        .unwrap()
    }

    #[test]
    fn load_then_clear() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());

        session.load(login());
        assert!(session.is_authenticated());
        assert_eq!(session.device_id(), Some("dev-1"));
        let user = session.user().unwrap();
        assert_eq!(user.display_name(), "Nur");
        assert!(user.is_agent());

        session.clear();
        assert_eq!(session, Session::default());
    }
}
