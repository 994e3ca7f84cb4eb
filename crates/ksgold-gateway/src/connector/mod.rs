//! 벤더 커넥터.

pub mod ksgold;

pub use ksgold::KsgoldGateway;
