pub mod category;
pub mod comment;
pub mod notice;
pub mod post;
pub mod user;

pub use category::{Entity as Category, Model as CategoryModel};
pub use comment::{Entity as Comment, Model as CommentModel};
pub use notice::{Entity as Notice, Model as NoticeModel, NoticeType};
pub use post::{Entity as Post, Model as PostModel};
pub use user::{Entity as User, Model as UserModel, UserRole};
