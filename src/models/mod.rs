pub mod book;
pub mod rating;
pub mod user;

pub use book::{Book, BookPatch, NewBook};
pub use rating::{NewRating, Rating};
pub use user::{NewUser, User};
