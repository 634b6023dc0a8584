use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{Registration, Role, User};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub fn register(&self, registration: Registration, role: Role) -> Result<User, DomainError> {
        let user = User::register(registration, role)?;
        if self.users.find_by_email(&user.email)?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }
        if self.users.find_by_phone(&user.phone)?.is_some() {
            return Err(DomainError::Conflict(
                "Phone number already registered".to_string(),
            ));
        }
        self.users.insert(&user)?;
        log::info!("user {} registered as {}", user.id, user.role);
        Ok(user)
    }

    pub fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("User"))
    }

    pub fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list()
    }

    pub fn set_active(&self, id: Uuid, active: bool) -> Result<User, DomainError> {
        let mut user = self.get(id)?;
        user.set_active(active);
        self.users.update(&user)?;
        Ok(user)
    }

    pub fn set_role(&self, id: Uuid, role: Role) -> Result<User, DomainError> {
        let mut user = self.get(id)?;
        user.set_role(role);
        self.users.update(&user)?;
        log::info!("user {} role set to {}", user.id, role);
        Ok(user)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.users.delete(id)? {
            return Err(DomainError::not_found("User"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;

    fn registration(email: &str, phone: &str) -> Registration {
        Registration {
            full_name: "Kiran Shah".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: None,
        }
    }

    #[test]
    fn duplicate_email_or_phone_conflicts() {
        let svc = UserService::new(MemoryStore::shared());
        svc.register(registration("kiran@example.com", "111"), Role::User)
            .expect("first");

        let by_email = svc
            .register(registration("KIRAN@example.com", "222"), Role::User)
            .expect_err("same email");
        assert!(matches!(by_email, DomainError::Conflict(m) if m.contains("Email")));

        let by_phone = svc
            .register(registration("other@example.com", "111"), Role::User)
            .expect_err("same phone");
        assert!(matches!(by_phone, DomainError::Conflict(m) if m.contains("Phone")));
    }

    #[test]
    fn admin_operations_update_the_stored_user() {
        let svc = UserService::new(MemoryStore::shared());
        let user = svc
            .register(registration("a@example.com", "1"), Role::User)
            .expect("register");

        svc.set_active(user.id, false).expect("deactivate");
        svc.set_role(user.id, Role::Admin).expect("promote");
        let stored = svc.get(user.id).expect("get");
        assert!(!stored.is_active);
        assert_eq!(stored.role, Role::Admin);

        svc.delete(user.id).expect("delete");
        assert!(matches!(svc.delete(user.id), Err(DomainError::NotFound(_))));
    }
}
