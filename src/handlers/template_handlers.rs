use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use askama::Template;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::session::{
    get_permissions, get_role, get_user_id, set_item_name, take_posted_values,
};
use crate::controllers::template::{
    ACTION_EDIT_TEMPLATE, ACTION_NEW_TEMPLATE, Outcome, RequestContext, TemplateController,
    TemplateServices,
};
use crate::errors::{AppError, render};
use crate::models::form_value::to_int;
use crate::templates_structs::{AlertTemplate, PageContext, TemplateFormTemplate};

use super::AppName;

/// Save endpoint of the manager; the form posts there.
const SAVE_PATH: &str = "/templates/save";

#[derive(Deserialize)]
pub struct NewTemplateQuery {
    catid: Option<String>,
}

pub async fn new_form(
    services: web::Data<TemplateServices>,
    app: web::Data<AppName>,
    session: Session,
    query: web::Query<NewTemplateQuery>,
) -> Result<HttpResponse, AppError> {
    let catid = query
        .catid
        .as_deref()
        .map(|v| to_int(&Value::String(v.to_string())));
    let ctx = request_context(&session, ACTION_NEW_TEMPLATE, 0, catid)?;
    show_form(&services, &app, &session, ctx, "New Template").await
}

pub async fn edit_form(
    services: web::Data<TemplateServices>,
    app: web::Data<AppName>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let ctx = request_context(&session, ACTION_EDIT_TEMPLATE, id, None)?;
    show_form(&services, &app, &session, ctx, "Edit Template").await
}

fn request_context(
    session: &Session,
    action: i64,
    element_id: i64,
    catid: Option<i64>,
) -> Result<RequestContext, AppError> {
    let user_id = get_user_id(session)
        .ok_or_else(|| AppError::Session("Not logged in".to_string()))?;
    let permissions = get_permissions(session)
        .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;
    Ok(RequestContext {
        action,
        element_id,
        catid,
        posted: take_posted_values(session),
        user_id,
        role: get_role(session),
        permissions,
    })
}

async fn show_form(
    services: &TemplateServices,
    app: &AppName,
    session: &Session,
    ctx: RequestContext,
    form_title: &str,
) -> Result<HttpResponse, AppError> {
    let controller = TemplateController::new(services, ctx);

    match controller.render().await? {
        Outcome::Ready(view) => {
            set_item_name(session, &view.item_name)?;
            let ctx = PageContext::build(session, &app.0)?;
            render(TemplateFormTemplate {
                ctx,
                form_action: SAVE_PATH.to_string(),
                form_title: form_title.to_string(),
                view,
            })
        }
        Outcome::NotFound { message } => alert(StatusCode::NOT_FOUND, app, message),
        Outcome::LockConflict { message } => alert(StatusCode::FORBIDDEN, app, message),
        Outcome::Busy { message } => alert(StatusCode::CONFLICT, app, message),
    }
}

fn alert(status: StatusCode, app: &AppName, message: String) -> Result<HttpResponse, AppError> {
    let body = AlertTemplate {
        app_name: app.0.clone(),
        message,
    }
    .render()?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}
