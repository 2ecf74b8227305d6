use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// Login page of the surrounding manager; sign-in itself is handled there.
const LOGIN_PATH: &str = "/login";

/// Middleware function that requires a signed-in manager session.
/// Anonymous requests are redirected to the manager login page.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let has_user = session.get::<i64>("user_id").unwrap_or(None).is_some();

    if !has_user {
        log::debug!("No manager session for {}, redirecting to login", req.path());
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", LOGIN_PATH))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
