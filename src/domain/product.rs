use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;
use super::pricing::{discounted_price, is_valid_discount, is_valid_price};

/// Generates `as_str`, `Display` and a strict `FromStr` for a string-backed enum.
macro_rules! string_enum {
    ($name:ident, $what:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::domain::errors::DomainError::InvalidInput(format!(
                        "Invalid {} value '{}'",
                        $what, other
                    ))),
                }
            }
        }
    };
}

pub(crate) use string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductStatus {
    #[default]
    InStock,
    OutOfStock,
    Preorder,
}

string_enum!(ProductStatus, "status", {
    InStock => "in-stock",
    OutOfStock => "out-of-stock",
    Preorder => "preorder",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Gold,
    Silver,
    Platinum,
    Diamond,
    Other,
}

string_enum!(Material, "material", {
    Gold => "Gold",
    Silver => "Silver",
    Platinum => "Platinum",
    Diamond => "Diamond",
    Other => "Other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Men,
    Women,
    #[default]
    Unisex,
    Kids,
}

string_enum!(Gender, "gender", {
    Men => "Men",
    Women => "Women",
    Unisex => "Unisex",
    Kids => "Kids",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoneDetail {
    pub stone_type: Option<String>,
    pub carat: Option<f64>,
    pub color: Option<String>,
    pub clarity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub quantity: i32,
    pub status: ProductStatus,
    pub average_rating: BigDecimal,
    pub num_reviews: i32,
    pub images: Vec<String>,
    pub material: Material,
    pub purity: Option<String>,
    pub weight: Option<BigDecimal>,
    pub stone_details: Vec<StoneDetail>,
    pub size: Option<String>,
    pub gender: Gender,
    pub occasion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new product. Numeric fields are already parsed.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub quantity: i32,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub material: Material,
    pub purity: Option<String>,
    pub weight: Option<BigDecimal>,
    pub stone_details: Vec<StoneDetail>,
    pub size: Option<String>,
    pub gender: Gender,
    pub occasion: Option<String>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub price: Option<BigDecimal>,
    pub discount: Option<BigDecimal>,
    pub quantity: Option<i32>,
    pub status: Option<ProductStatus>,
    pub images: Option<Vec<String>>,
    pub material: Option<Material>,
    pub purity: Option<String>,
    pub weight: Option<BigDecimal>,
    pub stone_details: Option<Vec<StoneDetail>>,
    pub size: Option<String>,
    pub gender: Option<Gender>,
    pub occasion: Option<String>,
}

/// Catalog data shown next to a cart or wishlist entry.
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub images: Vec<String>,
    pub category: Option<CategoryRef>,
}

#[derive(Debug, Clone)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

fn check_pricing(price: &BigDecimal, discount: &BigDecimal, quantity: i32) -> Result<(), DomainError> {
    if !is_valid_price(price) {
        return Err(DomainError::invalid("Price must be a non-negative number"));
    }
    if !is_valid_discount(discount) {
        return Err(DomainError::invalid(
            "Discount must be a valid number between 0 and 100",
        ));
    }
    if quantity < 0 {
        return Err(DomainError::invalid("Quantity cannot be negative"));
    }
    Ok(())
}

impl Product {
    pub fn create(owner_id: Uuid, draft: ProductDraft) -> Result<Self, DomainError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::invalid("Required product details missing!"));
        }
        check_pricing(&draft.price, &draft.discount, draft.quantity)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            category_id: draft.category_id,
            name,
            description: draft.description,
            overview: draft.overview,
            price: draft.price,
            discount: draft.discount,
            quantity: draft.quantity,
            status: draft.status,
            average_rating: BigDecimal::from(0),
            num_reviews: 0,
            images: draft.images,
            material: draft.material,
            purity: draft.purity,
            weight: draft.weight,
            stone_details: draft.stone_details,
            size: draft.size,
            gender: draft.gender,
            occasion: draft.occasion,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: ProductPatch) -> Result<(), DomainError> {
        let price = patch.price.unwrap_or_else(|| self.price.clone());
        let discount = patch.discount.unwrap_or_else(|| self.discount.clone());
        let quantity = patch.quantity.unwrap_or(self.quantity);
        check_pricing(&price, &discount, quantity)?;

        if let Some(name) = patch.name.map(|n| n.trim().to_string()) {
            if !name.is_empty() {
                self.name = name;
            }
        }
        self.price = price;
        self.discount = discount;
        self.quantity = quantity;
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.overview.is_some() {
            self.overview = patch.overview;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(images) = patch.images.filter(|i| !i.is_empty()) {
            self.images = images;
        }
        if let Some(material) = patch.material {
            self.material = material;
        }
        if patch.purity.is_some() {
            self.purity = patch.purity;
        }
        if patch.weight.is_some() {
            self.weight = patch.weight;
        }
        if let Some(stones) = patch.stone_details.filter(|s| !s.is_empty()) {
            self.stone_details = stones;
        }
        if patch.size.is_some() {
            self.size = patch.size;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if patch.occasion.is_some() {
            self.occasion = patch.occasion;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn reprice(
        &mut self,
        price: Option<BigDecimal>,
        discount: Option<BigDecimal>,
    ) -> Result<(), DomainError> {
        if price.is_none() && discount.is_none() {
            return Err(DomainError::invalid(
                "Please provide price or discount to update",
            ));
        }
        self.apply(ProductPatch {
            price,
            discount,
            ..ProductPatch::default()
        })
    }

    pub fn discounted_price(&self) -> BigDecimal {
        discounted_price(&self.price, &self.discount)
    }

    pub fn stock_message(&self) -> String {
        match self.quantity {
            q if q <= 0 => "Out of stock".to_string(),
            q if q < 10 => format!("{q} left in stock"),
            _ => "In stock".to_string(),
        }
    }

    pub fn summary(&self, category: Option<CategoryRef>) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price.clone(),
            discount: self.discount.clone(),
            images: self.images.clone(),
            category,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::str::FromStr;

    use super::*;

    pub(crate) fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    pub(crate) fn draft(name: &str, price: &str, discount: &str) -> ProductDraft {
        ProductDraft {
            category_id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            overview: None,
            price: dec(price),
            discount: dec(discount),
            quantity: 5,
            status: ProductStatus::InStock,
            images: vec![],
            material: Material::Gold,
            purity: Some("22K".to_string()),
            weight: Some(dec("4.5")),
            stone_details: vec![],
            size: Some("7".to_string()),
            gender: Gender::Unisex,
            occasion: None,
        }
    }

    #[test]
    fn create_rejects_out_of_range_values() {
        let owner = Uuid::new_v4();
        assert!(Product::create(owner, draft("Ring", "-1", "0")).is_err());
        assert!(Product::create(owner, draft("Ring", "10", "101")).is_err());
        assert!(Product::create(owner, draft("  ", "10", "5")).is_err());

        let mut negative_qty = draft("Ring", "10", "5");
        negative_qty.quantity = -1;
        assert!(Product::create(owner, negative_qty).is_err());
    }

    #[test]
    fn discounted_price_follows_live_fields() {
        let mut product = Product::create(Uuid::new_v4(), draft("Ring", "1000", "10"))
            .expect("valid product");
        assert_eq!(product.discounted_price(), dec("900"));

        product
            .reprice(None, Some(dec("25")))
            .expect("reprice should succeed");
        assert_eq!(product.discounted_price(), dec("750"));
    }

    #[test]
    fn reprice_requires_a_field() {
        let mut product =
            Product::create(Uuid::new_v4(), draft("Ring", "10", "0")).expect("valid product");
        assert!(matches!(
            product.reprice(None, None),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn apply_keeps_fields_that_are_not_supplied() {
        let mut product =
            Product::create(Uuid::new_v4(), draft("Ring", "10", "0")).expect("valid product");
        product
            .apply(ProductPatch {
                quantity: Some(3),
                size: Some("8".to_string()),
                ..ProductPatch::default()
            })
            .expect("patch should apply");

        assert_eq!(product.name, "Ring");
        assert_eq!(product.price, dec("10"));
        assert_eq!(product.quantity, 3);
        assert_eq!(product.size.as_deref(), Some("8"));
        assert_eq!(product.purity.as_deref(), Some("22K"));
    }

    #[test]
    fn stock_message_thresholds() {
        let mut product =
            Product::create(Uuid::new_v4(), draft("Ring", "10", "0")).expect("valid product");
        product.quantity = 0;
        assert_eq!(product.stock_message(), "Out of stock");
        product.quantity = 9;
        assert_eq!(product.stock_message(), "9 left in stock");
        product.quantity = 10;
        assert_eq!(product.stock_message(), "In stock");
    }

    #[test]
    fn enums_parse_their_wire_names_only() {
        assert_eq!(
            "out-of-stock".parse::<ProductStatus>().ok(),
            Some(ProductStatus::OutOfStock)
        );
        assert!("gold".parse::<Material>().is_err());
        assert_eq!(Gender::default().as_str(), "Unisex");
        assert_eq!(Material::ALL.len(), 5);
    }
}
