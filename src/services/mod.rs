pub mod friends;
pub mod ranking;

pub use friends::FriendService;
pub use ranking::FilmRankingService;
