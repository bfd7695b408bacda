pub mod classify;
pub mod config;
pub mod init;
pub mod resolve;
pub mod route;
pub mod specialist;
