use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use cms_manager::config::AppConfig;
use cms_manager::controllers::template::TemplateServices;
use cms_manager::events::PluginRegistry;
use cms_manager::handlers::{AppName, template_handlers};
use cms_manager::lexicon::StaticLexicon;
use cms_manager::store::PgStore;
use cms_manager::{auth, db};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let store = Arc::new(PgStore::new(pool));
    let services = TemplateServices {
        store: store.clone(),
        catalog: store.clone(),
        locks: store,
        lexicon: Arc::new(StaticLexicon::english()),
        events: Arc::new(PluginRegistry::new()),
        privileged_role: config.privileged_role,
    };
    let services = web::Data::new(services);
    let app_name = web::Data::new(AppName(config.app_name.clone()));
    let secret_key = config.session_key.clone();

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(services.clone())
            .app_data(app_name.clone())
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    // /templates/new BEFORE /templates/{id} to avoid routing conflict
                    .route("/templates/new", web::get().to(template_handlers::new_form))
                    .route("/templates/{id}/edit", web::get().to(template_handlers::edit_form)),
            )
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
