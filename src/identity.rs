//! Caller identity as forwarded by the authenticating gateway.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Owner,
    Admin,
}

impl Role {
    fn from_header(value: Option<&str>) -> Role {
        match value.map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
            Some(r) if r.eq_ignore_ascii_case("owner") => Role::Owner,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: String,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners of a record and admins may act on it.
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

impl FromRequest for Requester {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let requester = match header(USER_ID_HEADER) {
            Some(user_id) => Ok(Requester::new(
                user_id,
                Role::from_header(header(USER_ROLE_HEADER)),
            )),
            None => Err(AppError::Unauthorized),
        };
        ready(requester)
    }
}
