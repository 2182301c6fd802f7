pub mod jwt;
pub mod session;
