pub mod auth_service;
pub mod note_service;
