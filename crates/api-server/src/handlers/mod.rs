pub mod admin;
pub mod content;
pub mod forms;
pub mod health;
pub mod sections;
