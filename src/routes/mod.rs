use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod registration;
pub mod reservation;
pub mod stadium;
pub mod team;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    // Stadium directory (require authentication)
    cfg.service(
        web::scope("/stadium")
            .wrap(AuthMiddleware)
            .service(stadium::register_stadium)
            .service(stadium::get_all_stadiums)
            .service(stadium::get_stadium_info),
    );
    // Team directory (require authentication)
    cfg.service(
        web::scope("/team")
            .wrap(AuthMiddleware)
            .service(team::register_team)
            .service(team::get_all_teams)
            .service(team::get_team_info),
    );
    // Reservation workflow (require authentication)
    cfg.service(
        web::scope("/reservation")
            .wrap(AuthMiddleware)
            .service(reservation::create_reservation)
            .service(reservation::list_reservations)
            .service(reservation::update_reservation_status)
            .service(reservation::add_opponent_team)
            .service(reservation::select_opponent_team),
    );
}
