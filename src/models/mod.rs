pub mod template;
pub mod transaction;
