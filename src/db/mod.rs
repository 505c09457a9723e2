pub mod file_settings_repository;
pub mod memory_settings_repository;
pub mod settings_repository;
