//! Core types for Quickbuy.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod device;
pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod workflow;

pub use device::{DeviceCondition, DeviceType};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
pub use workflow::{TransactionStatus, TransitionError};
