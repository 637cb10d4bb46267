pub mod cookie;
pub mod jwt;
pub mod slug;
pub mod time;

pub use jwt::encode_access_token;
pub use slug::generate_post_slug;
pub use time::format_utc;
