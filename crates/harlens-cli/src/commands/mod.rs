pub mod analyze;
pub mod completion;
pub mod init_config;
pub mod validate;
