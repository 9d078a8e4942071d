//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: Option<String>,
    pub image_url: String,
    pub price: u64,
    pub discount_price: Option<u64>,
    pub available: u32,
}

/// Product Update Data
///
/// Replaces every editable field of the product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub sku: Option<String>,
    pub image_url: String,
    pub price: u64,
    pub discount_price: Option<u64>,
    pub available: u32,
}
