mod commands;
mod models;
pub mod protocol;

pub use commands::{
    CommentMutation, CreateComment, DeleteComment, ToggleLike, UpdateComment, ValidationError,
};
pub use models::{Author, Comment, CommentId, Post, PostId, UserId};
