use std::future::{ready, Ready};

use actix_web::cookie::Cookie;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponseBuilder};
use log::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sessionid";
const MAX_SESSION_KEY_LEN: usize = 255;

/// The shopper's session key, read from the `sessionid` cookie or freshly
/// issued when the request carries none.
#[derive(Debug, Clone)]
pub struct Session {
    key: String,
    issued: bool,
}

impl Session {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Set the cookie on `builder` if this session was issued for the
    /// current request.
    pub fn attach(&self, builder: &mut HttpResponseBuilder) {
        if self.issued {
            builder.cookie(
                Cookie::build(SESSION_COOKIE, self.key.clone())
                    .path("/")
                    .http_only(true)
                    .finish(),
            );
        }
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = match req.cookie(SESSION_COOKIE) {
            Some(c) if !c.value().is_empty() && c.value().len() <= MAX_SESSION_KEY_LEN => Session {
                key: c.value().to_string(),
                issued: false,
            },
            _ => {
                let key = Uuid::new_v4().simple().to_string();
                debug!("Issuing session {key}");
                Session { key, issued: true }
            }
        };
        ready(Ok(session))
    }
}
