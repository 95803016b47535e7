mod dto;
mod model;
mod repository;

pub use dto::{CreateUserDto, UpdateUserDto, UserPatch};
pub use model::User;
pub use repository::UserRepository;
