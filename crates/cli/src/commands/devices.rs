//! Device catalog commands.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use quickbuy_core::{DeviceCondition, DeviceId, DeviceType};
use quickbuy_store::db::{DeviceFilter, DeviceRepository};
use quickbuy_store::models::Device;
use quickbuy_store::{RecordStore, RepositoryError};

use super::CommandError;

/// Arguments of `devices add`.
pub struct NewDeviceInput {
    pub brand: String,
    pub model: String,
    pub device_type: DeviceType,
    pub condition: DeviceCondition,
    pub storage: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub images: Vec<String>,
}

/// Search the catalog.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded.
pub fn list(store: &RecordStore, filter: &DeviceFilter) -> Result<(), Box<dyn std::error::Error>> {
    let devices = DeviceRepository::new(store).search(filter)?;

    info!("{} device(s)", devices.len());
    for d in &devices {
        let savings = d
            .savings_percent()
            .map(|p| format!(" (save {p}%)"))
            .unwrap_or_default();
        info!(
            "  #{} {} {} {} - {}, {}, {}{}{}",
            d.id,
            d.brand,
            d.model,
            d.storage,
            d.device_type,
            d.condition,
            d.listed_price(),
            savings,
            if d.in_stock { "" } else { " [out of stock]" }
        );
    }
    Ok(())
}

/// List a device for sale.
///
/// # Errors
///
/// Returns an error for a non-positive price, more than three images, or a
/// failed write.
pub fn add(store: &RecordStore, input: NewDeviceInput) -> Result<(), Box<dyn std::error::Error>> {
    if input.price <= Decimal::ZERO {
        return Err(CommandError::InvalidPrice(format!(
            "asking price must be positive, got {}",
            input.price
        ))
        .into());
    }
    let original_price = input.original_price.unwrap_or(input.price);
    if original_price < input.price {
        return Err(CommandError::InvalidPrice(format!(
            "original price {original_price} is below the asking price {}",
            input.price
        ))
        .into());
    }

    let device = DeviceRepository::new(store).insert(Device {
        id: DeviceId::new(0),
        brand: input.brand.trim().to_owned(),
        model: input.model.trim().to_owned(),
        device_type: input.device_type,
        condition: input.condition,
        storage: input.storage,
        price: input.price,
        original_price,
        in_stock: true,
        images: input.images,
        added_date: Utc::now().date_naive(),
    })?;

    info!(
        "Device listed! ID: {}, {} {} at {}",
        device.id,
        device.brand,
        device.model,
        device.listed_price()
    );
    Ok(())
}

/// Mark a device in or out of stock.
///
/// # Errors
///
/// Returns an error if the device does not exist.
pub fn set_stock(
    store: &RecordStore,
    id: DeviceId,
    in_stock: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let device: Device = DeviceRepository::new(store).update_with(id, |d| {
        d.in_stock = in_stock;
        Ok::<(), RepositoryError>(())
    })?;
    info!(
        "Device #{} is now {}",
        device.id,
        if device.in_stock { "in stock" } else { "out of stock" }
    );
    Ok(())
}

/// Remove a device listing.
///
/// # Errors
///
/// Returns an error if the device does not exist.
pub fn remove(store: &RecordStore, id: DeviceId) -> Result<(), Box<dyn std::error::Error>> {
    let removed = DeviceRepository::new(store).delete(id)?;
    info!("Removed device #{} ({} {})", removed.id, removed.brand, removed.model);
    Ok(())
}
