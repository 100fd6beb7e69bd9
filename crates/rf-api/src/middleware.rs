//! Request logging and CORS for the forum API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Access log in the combined format plus the time taken.
pub fn standard_middleware() -> Logger {
    Logger::new(r#"%a "%r" %s %b "%{User-Agent}i" %Dms"#)
}

/// The API is read and written by browser clients on other origins.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}
