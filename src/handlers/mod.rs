pub mod contacts;
pub mod email;
pub mod files;
pub mod messages;
pub mod portal;
pub mod quotes;
