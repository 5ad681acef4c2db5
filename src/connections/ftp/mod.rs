pub mod ftp_connection;

pub use ftp_connection::{FtpConnection, FtpConnectionFactory};
