pub mod configure;
pub mod gate;
pub mod generate;
pub mod init;
pub mod submit;
pub mod validate;
