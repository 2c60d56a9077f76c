pub mod device;
pub mod email;
pub mod token;
pub mod username;
