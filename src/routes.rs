mod health_check;
mod preflight;
mod registration;

pub use health_check::health_check;
pub use preflight::{preflight, AllowedOrigin};
pub use registration::{error_chain_fmt, register, RegistrationError, RegistrationForm};
