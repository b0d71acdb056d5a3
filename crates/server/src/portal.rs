//! Browser UI for managing clientes.
//!
//! `GET /` renders the table server-side and embeds the record list plus the
//! validation rule table, so the page validates with the same rules as the API
//! before calling `/api/cliente`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use cadastro_core::validation::{REQUIRED_MESSAGE, RULES};
use cadastro_db::repositories::ClienteRepository;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::{error, info, warn};

pub const INDEX_TEMPLATE: &str = "clientes/index.html";
pub const API_BASE: &str = "/api/cliente";

#[derive(Clone)]
pub struct PortalState {
    repository: Arc<dyn ClienteRepository>,
    templates: Arc<Tera>,
}

/// Loads templates from `templates/` when present, else the copy compiled into the binary.
fn init_templates() -> Arc<Tera> {
    let mut tera = match Tera::new("templates/**/*.html") {
        Ok(tera) => tera,
        Err(error) => {
            warn!(error = %error, "failed to load templates from filesystem, using embedded copy");
            Tera::default()
        }
    };

    if !tera.get_template_names().any(|name| name == INDEX_TEMPLATE) {
        if let Err(error) = tera.add_raw_template(
            INDEX_TEMPLATE,
            include_str!("../../../templates/clientes/index.html"),
        ) {
            error!(error = %error, "embedded cliente template failed to parse");
        }
    }

    Arc::new(tera)
}

pub fn router(repository: Arc<dyn ClienteRepository>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .with_state(PortalState { repository, templates: init_templates() })
}

pub async fn index_page(
    State(state): State<PortalState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let clientes = state.repository.list().await.map_err(|error| {
        error!(
            event_name = "portal.index.failed",
            correlation_id = "portal",
            error = %error,
            "listing clientes for the page failed"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Erro ao carregar clientes</h1><pre>{}</pre>",
                escape_html(&error.to_string())
            )),
        )
    })?;

    let mut context = Context::new();
    context.insert("clientes", &clientes);
    context.insert("clientes_json", &embed_json(&clientes));
    context.insert("rules_json", &embed_json(&RULES));
    context.insert("required_message", REQUIRED_MESSAGE);
    context.insert("api_base", API_BASE);

    let html = state.templates.render(INDEX_TEMPLATE, &context).map_err(|error| {
        error!(
            event_name = "portal.index.template_error",
            correlation_id = "portal",
            error = ?error,
            "template rendering failed"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("<h1>Template Error</h1><pre>{}</pre>", escape_html(&format!("{error:?}")))),
        )
    })?;

    info!(
        event_name = "portal.index.rendered",
        correlation_id = "portal",
        count = clientes.len(),
        "rendered cliente page"
    );
    Ok(Html(html))
}

/// JSON safe to place inside a `<script type="application/json">` element.
fn embed_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
