//! Services that turn client results into user-facing text.

mod assistant;
mod bookclub;
pub mod messages;
mod weather;

pub use assistant::AssistantService;
pub use bookclub::BookClubService;
pub use weather::WeatherService;
