//! Value Object Module

pub mod security_mode;
pub mod user_name;
pub mod user_role;
