pub mod reservation_handler;
pub mod stadium_handler;
pub mod team_handler;
