//! Record and session types.
//!
//! These are the persisted shapes. Field names serialize in `camelCase` to
//! stay compatible with data written by the browser app.

pub mod agent;
pub mod customer;
pub mod device;
pub mod session;
pub mod transaction;

pub use agent::{Agent, NewAgent};
pub use customer::Customer;
pub use device::Device;
pub use session::{AdminProfile, PaymentDetails, PaymentMethod, SessionAgent, SessionCustomer};
pub use transaction::{SellSubmission, StatusChange, Transaction};
