use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::Address;
use super::product::string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

string_enum!(Role, "role", {
    User => "user",
    Admin => "admin",
});

/// Account data. Credentials are held by the authentication service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub address: Option<Address>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<Address>,
}

impl User {
    pub fn register(reg: Registration, role: Role) -> Result<Self, DomainError> {
        let full_name = reg.full_name.trim().to_string();
        let email = normalize_email(&reg.email);
        let phone = reg.phone.trim().to_string();

        if full_name.is_empty() {
            return Err(DomainError::invalid("Full name is required"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::invalid("A valid email is required"));
        }
        if phone.is_empty() {
            return Err(DomainError::invalid("Phone number is required"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            full_name,
            email,
            phone,
            role,
            address: reg.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
