use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest,
};
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::Claims;

/// The authenticated principal, extracted from claims the auth middleware
/// placed in request extensions. Ownership checks compare this id against
/// the document's `user` field.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(claims) = req.extensions().get::<Claims>().cloned() else {
            return ready(Err(ErrorUnauthorized("User not authenticated")));
        };
        match ObjectId::parse_str(&claims.user_id) {
            Ok(user_id) => ready(Ok(AuthenticatedUser {
                user_id,
                email: claims.sub,
            })),
            Err(_) => ready(Err(ErrorUnauthorized("Invalid user id in token"))),
        }
    }
}
