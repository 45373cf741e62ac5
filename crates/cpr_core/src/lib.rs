pub mod catalog;
pub mod domain;
pub mod error;
pub mod evidence;
pub mod export;
pub mod fallback;
pub mod layout;
pub mod store;
pub mod validate;
pub mod wizard;
