pub mod bookmarks;
pub mod comments;
pub mod likes;
pub mod posts;
pub mod tags;
pub mod users;

pub use bookmarks::BookmarkRepository;
pub use comments::CommentRepository;
pub use likes::LikeRepository;
pub use posts::PostRepository;
pub use tags::TagRepository;
pub use users::UserRepository;
