use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn create(name: &str, description: Option<&str>) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("Category name is required!"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(strip_markup).filter(|d| !d.is_empty()),
            deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Soft delete. Products keep referencing the row.
    pub fn mark_deleted(&mut self) {
        if !self.deleted {
            self.deleted = true;
            self.updated_at = Utc::now();
        }
    }
}

/// Drops anything between `<` and `>` and trims the remainder.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name() {
        assert!(matches!(
            Category::create("   ", None),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn description_markup_is_removed() {
        let category = Category::create("Rings", Some("<b>Gold</b> rings <script>x</script>"))
            .expect("valid category");
        assert_eq!(category.description.as_deref(), Some("Gold rings x"));
    }

    #[test]
    fn mark_deleted_is_idempotent() {
        let mut category = Category::create("Rings", None).expect("valid category");
        category.mark_deleted();
        let stamp = category.updated_at;
        category.mark_deleted();
        assert!(category.deleted);
        assert_eq!(category.updated_at, stamp);
    }
}
