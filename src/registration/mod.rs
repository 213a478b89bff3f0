pub mod client;
pub mod error;
pub mod types;

pub use client::{IdentityRegistrar, RegistrationClient};
pub use error::RegistrationError;
