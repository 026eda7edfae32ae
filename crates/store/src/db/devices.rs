//! Device catalog collection and search.

use rust_decimal::Decimal;

use quickbuy_core::{DeviceCondition, DeviceId, DeviceType};

use super::{Record, Repository, RepositoryError, keys, seed_date};
use crate::models::Device;

/// Repository for the device catalog.
pub type DeviceRepository<'a> = Repository<'a, Device>;

impl Record for Device {
    type Id = DeviceId;

    const KEY: &'static str = keys::DEVICES;
    const KIND: &'static str = "device";

    fn id(&self) -> DeviceId {
        self.id
    }

    fn set_id(&mut self, id: DeviceId) {
        self.id = id;
    }

    fn seed() -> Result<Vec<Self>, RepositoryError> {
        Ok(vec![Self {
            id: DeviceId::new(1),
            brand: "Apple".to_owned(),
            model: "iPhone 13 Pro".to_owned(),
            device_type: DeviceType::Smartphone,
            condition: DeviceCondition::Excellent,
            storage: "256GB".to_owned(),
            price: Decimal::new(750, 0),
            original_price: Decimal::new(999, 0),
            in_stock: true,
            images: vec!["iphone-13-pro-front.jpg".to_owned()],
            added_date: seed_date(2024, 2, 1)?,
        }])
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.brand.trim().is_empty() || self.model.trim().is_empty() {
            return Err(RepositoryError::invalid(
                Self::KIND,
                "brand and model are required",
            ));
        }
        if self.price < Decimal::ZERO || self.original_price < Decimal::ZERO {
            return Err(RepositoryError::invalid(Self::KIND, "prices cannot be negative"));
        }
        if self.images.len() > Self::MAX_IMAGES {
            return Err(RepositoryError::invalid(
                Self::KIND,
                format!("at most {} images are allowed", Self::MAX_IMAGES),
            ));
        }
        Ok(())
    }
}

/// Catalog search criteria. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    /// Case-insensitive brand match.
    pub brand: Option<String>,
    pub device_type: Option<DeviceType>,
    /// Minimum acceptable grade (e.g. `Good` also matches `Excellent`).
    pub min_condition: Option<DeviceCondition>,
    pub in_stock_only: bool,
    pub max_price: Option<Decimal>,
}

impl DeviceFilter {
    /// Whether `device` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, device: &Device) -> bool {
        self.brand
            .as_deref()
            .is_none_or(|b| device.brand.eq_ignore_ascii_case(b))
            && self.device_type.is_none_or(|t| device.device_type == t)
            && self.min_condition.is_none_or(|c| device.condition <= c)
            && (!self.in_stock_only || device.in_stock)
            && self.max_price.is_none_or(|p| device.price <= p)
    }
}

impl Repository<'_, Device> {
    /// Devices matching `filter`, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn search(&self, filter: &DeviceFilter) -> Result<Vec<Device>, RepositoryError> {
        let mut found: Vec<Device> = self
            .all()?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        found.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::db::RecordStore;

    fn catalog(store: &RecordStore) -> DeviceRepository<'_> {
        let devices = DeviceRepository::new(store);
        let mut laptop = Device::seed().unwrap().remove(0);
        laptop.brand = "Dell".to_owned();
        laptop.model = "XPS 13".to_owned();
        laptop.device_type = DeviceType::Laptop;
        laptop.condition = DeviceCondition::Fair;
        laptop.price = Decimal::new(520, 0);
        laptop.in_stock = false;
        devices.insert(laptop).unwrap();
        devices
    }

    #[test]
    fn test_search_default_returns_all_by_price() {
        let store = RecordStore::in_memory();
        let found = catalog(&store).search(&DeviceFilter::default()).unwrap();
        let models: Vec<_> = found.iter().map(|d| d.model.as_str()).collect();
        assert_eq!(models, vec!["XPS 13", "iPhone 13 Pro"]);
    }

    #[test]
    fn test_search_filters() {
        let store = RecordStore::in_memory();
        let devices = catalog(&store);

        let in_stock = DeviceFilter {
            in_stock_only: true,
            ..DeviceFilter::default()
        };
        assert_eq!(devices.search(&in_stock).unwrap().len(), 1);

        let by_brand = DeviceFilter {
            brand: Some("dell".to_owned()),
            ..DeviceFilter::default()
        };
        assert_eq!(devices.search(&by_brand).unwrap()[0].model, "XPS 13");

        let good_or_better = DeviceFilter {
            min_condition: Some(DeviceCondition::Good),
            ..DeviceFilter::default()
        };
        assert_eq!(devices.search(&good_or_better).unwrap()[0].brand, "Apple");

        let cheap = DeviceFilter {
            max_price: Some(Decimal::new(600, 0)),
            device_type: Some(DeviceType::Smartphone),
            ..DeviceFilter::default()
        };
        assert!(devices.search(&cheap).unwrap().is_empty());
    }

    #[test]
    fn test_too_many_images_rejected() {
        let store = RecordStore::in_memory();
        let devices = DeviceRepository::new(&store);
        let mut device = Device::seed().unwrap().remove(0);
        device.images = vec!["a.jpg".to_owned(); 4];
        assert!(devices.insert(device).is_err());
        assert_eq!(devices.count().unwrap(), 1);
    }

    #[test]
    fn test_savings_percent_from_seed() {
        let device = Device::seed().unwrap().remove(0);
        assert_eq!(device.savings_percent(), Some(Decimal::new(25, 0)));
    }
}
