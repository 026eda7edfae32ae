//! Catalog device types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbuy_core::{DeviceCondition, DeviceId, DeviceType, Price};

/// A refurbished device listed for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique device ID.
    pub id: DeviceId,
    /// Manufacturer, e.g. "Apple".
    pub brand: String,
    /// Model name, e.g. "iPhone 13 Pro".
    pub model: String,
    /// Kind of device.
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Grade.
    pub condition: DeviceCondition,
    /// Storage capacity label, e.g. "256GB".
    pub storage: String,
    /// Asking price.
    pub price: Decimal,
    /// Price when new.
    pub original_price: Decimal,
    /// Whether the device can be bought right now.
    pub in_stock: bool,
    /// Image references, at most [`Device::MAX_IMAGES`].
    #[serde(default)]
    pub images: Vec<String>,
    /// Date the listing was created.
    pub added_date: NaiveDate,
}

impl Device {
    /// Maximum number of images per listing.
    pub const MAX_IMAGES: usize = 3;

    /// Asking price with currency.
    #[must_use]
    pub fn listed_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Percentage off the original price, if discounted.
    #[must_use]
    pub fn savings_percent(&self) -> Option<Decimal> {
        self.listed_price().savings_percent(self.original_price)
    }
}
