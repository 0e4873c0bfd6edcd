pub mod inspector;
pub mod reports;
