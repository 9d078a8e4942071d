//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: Option<String>,
    pub image_url: String,
    pub price: u64,
    pub discount_price: Option<u64>,
    pub available: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Price charged per unit: the discount price when it undercuts the list price.
    #[must_use]
    pub fn unit_price(&self) -> u64 {
        match self.discount_price {
            Some(discount_price) if discount_price < self.price => discount_price,
            _ => self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: u64, discount_price: Option<u64>) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            name: "Widget".to_string(),
            sku: None,
            image_url: String::new(),
            price,
            discount_price,
            available: 1,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    #[test]
    fn unit_price_prefers_lower_discount_price() {
        assert_eq!(product(1000, Some(800)).unit_price(), 800);
    }

    #[test]
    fn unit_price_ignores_discount_price_above_list_price() {
        assert_eq!(product(1000, Some(1200)).unit_price(), 1000);
        assert_eq!(product(1000, None).unit_price(), 1000);
    }
}
