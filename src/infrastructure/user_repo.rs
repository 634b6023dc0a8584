use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::User;
use crate::schema::users;

use super::models::UserRow;

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(users::table)
            .values(&UserRow::from_domain(user)?)
            .execute(&mut conn)?;
        Ok(())
    }

    fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::update(users::table.find(user.id))
            .set(&UserRow::from_domain(user)?)
            .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;
        users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(UserRow::into_domain)
            .transpose()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;
        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(UserRow::into_domain)
            .transpose()
    }

    fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;
        users::table
            .filter(users::phone.eq(phone))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(UserRow::into_domain)
            .transpose()
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = users::table
            .select(UserRow::as_select())
            .order(users::created_at.asc())
            .load(&mut conn)?;
        rows.into_iter().map(UserRow::into_domain).collect()
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(users::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn count(&self) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(users::table.count().get_result(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::DieselUserRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::ports::UserRepository;
    use crate::domain::user::{Registration, Role, User};
    use crate::infrastructure::testing::setup_db;

    fn user(email: &str, phone: &str) -> User {
        User::register(
            Registration {
                full_name: "Kiran Das".to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                address: None,
            },
            Role::User,
        )
        .expect("valid registration")
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn lookups_by_email_and_phone() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);
        let kiran = user("kiran@example.com", "9111111111");
        repo.insert(&kiran).expect("insert failed");

        let by_email = repo
            .find_by_email("kiran@example.com")
            .expect("find failed")
            .expect("user should exist");
        assert_eq!(by_email.id, kiran.id);
        assert!(repo
            .find_by_phone("9111111111")
            .expect("find failed")
            .is_some());
        assert_eq!(repo.count().expect("count failed"), 1);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn duplicate_email_is_a_conflict() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);
        repo.insert(&user("dup@example.com", "9222222222"))
            .expect("insert failed");

        assert!(matches!(
            repo.insert(&user("dup@example.com", "9333333333")),
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn update_and_delete() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);
        let mut u = user("asha@example.com", "9444444444");
        repo.insert(&u).expect("insert failed");

        u.set_role(Role::Admin);
        u.set_active(false);
        repo.update(&u).expect("update failed");
        let found = repo
            .find_by_id(u.id)
            .expect("find failed")
            .expect("user should exist");
        assert_eq!(found.role, Role::Admin);
        assert!(!found.is_active);

        assert!(repo.delete(u.id).expect("delete failed"));
        assert!(!repo.delete(u.id).expect("delete failed"));
    }
}
