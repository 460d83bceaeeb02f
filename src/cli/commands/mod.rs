pub mod email;
pub mod files;
pub mod message;
pub mod portal;
pub mod quote;
pub mod stage;
pub mod token;
