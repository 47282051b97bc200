mod film;
mod reference;
mod user;

pub use film::Film;
pub use reference::{Genre, Mpa};
pub use user::{Friendship, User};
