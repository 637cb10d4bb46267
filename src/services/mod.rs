pub mod auth;
pub mod bootstrap_admin;
pub mod category;
pub mod comment;
pub mod notice;
pub mod post;
pub mod user;

pub use auth::AuthService;
pub use category::CategoryService;
pub use comment::CommentService;
pub use notice::NoticeService;
pub use post::PostService;
pub use user::UserService;
