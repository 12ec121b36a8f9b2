pub mod client_ip;
pub mod database;
pub mod rate_limiter;
