mod admin;
mod auth;

pub use admin::AdminGuard;
pub use auth::{credentials_from_request, device_info_from_request, AuthUser};

#[cfg(test)]
pub use admin::ADMIN_KEY_HEADER;
#[cfg(test)]
pub use auth::DEVICE_ID_HEADER;
