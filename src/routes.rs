use crate::{
    api::{attendance, clipboard, slots},
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Context, Result};
use std::sync::Arc;

pub type RateLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with the same burst.
pub fn build_limiter(requests_per_min: u32) -> Result<RateLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limit configuration")?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<RateLimiter>) {
    // Malformed bodies and path segments answer with the same JSON shape as handler errors
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter) // rate limiting
            .service(
                web::resource("/attendance/variance")
                    .route(web::post().to(attendance::compute_variance)),
            )
            .service(
                web::scope("/orgs/{organization}")
                    // /slots
                    .service(web::resource("/slots").route(web::post().to(slots::create_slot)))
                    // /slots/day/{date}
                    .service(
                        web::resource("/slots/day/{date}")
                            .route(web::get().to(slots::day_slots))
                            .route(web::delete().to(slots::delete_day)),
                    )
                    // /slots/week/{start}
                    .service(
                        web::resource("/slots/week/{start}")
                            .route(web::get().to(slots::week_slots))
                            .route(web::delete().to(slots::delete_week)),
                    )
                    // /slots/{id}
                    .service(
                        web::resource("/slots/{id}")
                            .route(web::put().to(slots::update_slot))
                            .route(web::delete().to(slots::delete_slot)),
                    )
                    .service(
                        web::resource("/slots/{id}/bookings")
                            .route(web::post().to(attendance::book)),
                    )
                    .service(
                        web::resource("/slots/{id}/bookings/{customer}")
                            .route(web::delete().to(attendance::cancel_booking)),
                    )
                    .service(
                        web::resource("/slots/{id}/attendance")
                            .route(web::get().to(attendance::slot_attendance)),
                    )
                    .service(
                        web::resource("/slots/{id}/attendance/{customer}")
                            .route(web::put().to(attendance::mark_attendance)),
                    )
                    // /clipboard
                    .service(
                        web::resource("/clipboard")
                            .route(web::get().to(clipboard::show_clipboard))
                            .route(web::delete().to(clipboard::clear_clipboard)),
                    )
                    .service(
                        web::resource("/clipboard/day/{date}")
                            .route(web::post().to(clipboard::copy_day)),
                    )
                    .service(
                        web::resource("/clipboard/week/{start}")
                            .route(web::post().to(clipboard::copy_week)),
                    )
                    .service(
                        web::resource("/clipboard/day/{date}/paste")
                            .route(web::post().to(clipboard::paste_day)),
                    )
                    .service(
                        web::resource("/clipboard/week/{start}/paste")
                            .route(web::post().to(clipboard::paste_week)),
                    ),
            ),
    );
}

// COPY / PASTE
//  ├─ POST /clipboard/day/{date}          copy one day
//  ├─ POST /clipboard/week/{start}        copy seven days
//  └─ POST /clipboard/.../paste           new ids, shifted dates
