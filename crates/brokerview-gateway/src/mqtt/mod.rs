pub mod link;
pub mod reason;
