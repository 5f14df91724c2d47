pub mod client;
pub mod rate_limiter;
pub mod user_agents;

pub use client::HttpClient;
pub use rate_limiter::RateLimiter;
