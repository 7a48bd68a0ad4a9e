mod api_key;
mod rate_limit;

pub use api_key::{API_KEY_HEADER, api_key_middleware};
pub use rate_limit::{FORWARDED_FOR_HEADER, client_key, rate_limit_middleware};
