// src/api/handlers/mod.rs
mod dog;
mod health;

pub use dog::{api_not_found, get_dog_image};
pub use health::health_check;
