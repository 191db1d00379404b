use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use axum_extra::extract::Form;
use minijinja::context;
use server_api::{
    find_product, list_products, list_users, register_user, search_products, submit_contact,
    ApiContext,
};
use shared::{
    domain::ProductId,
    error::{PageError, PageException},
    protocol::{ContactForm, ProductLookup, ProductQuery, RegistrationForm, SearchForm},
};
use storage::Storage;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

mod app_state;
mod config;
mod render;

use app_state::AppState;
use config::load_settings;
use render::Renderer;

const HOME_TITLE: &str = "Bienvenido a la tienda";
const HOME_MESSAGE: &str = "Esta es tu primera aplicación web con Rust y plantillas Jinja";

const RENDER_FAILURE_MESSAGE: &str = "No se ha podido mostrar la página";

type PageResult = Result<Html<String>, (StatusCode, Html<String>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let renderer = Renderer::new(&settings.site_title)?;
    let storage = Storage::new();
    info!(
        products = storage.list_products().len(),
        static_dir = %settings.static_dir.display(),
        "catalog seeded"
    );

    let state = AppState {
        api: ApiContext::new(storage),
        renderer,
        static_dir: settings.static_dir,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/navegacion", get(navigation))
        .route("/productos", get(http_list_products))
        .route("/producto/:product_id", get(http_show_product))
        .route("/contacto", get(contact_form).post(http_submit_contact))
        .route("/registro", get(registration_form).post(http_register_user))
        .route("/usuarios", get(http_list_users))
        .route("/buscar", post(http_search_products))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn page(state: &AppState, template: &str, ctx: minijinja::Value) -> PageResult {
    state
        .renderer
        .render(template, ctx)
        .map(Html)
        .map_err(|err| render_failure(state, err))
}

/// Shows the failure through the error page; falls back to plain text if
/// that page cannot be rendered either.
fn render_failure(state: &AppState, err: PageException) -> (StatusCode, Html<String>) {
    error!(template = %err.template(), error = %err, "failed to render page");
    let body = state
        .renderer
        .render(
            "error.html",
            context! { mensaje => RENDER_FAILURE_MESSAGE, error => PageError::from(&err) },
        )
        .unwrap_or_else(|fallback| {
            error!(error = %fallback, "failed to render error page");
            RENDER_FAILURE_MESSAGE.to_string()
        });
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body))
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().map_err(|error| {
        error!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn home(State(state): State<Arc<AppState>>) -> PageResult {
    page(
        &state,
        "inicio.html",
        context! { titulo => HOME_TITLE, mensaje => HOME_MESSAGE },
    )
}

async fn navigation(State(state): State<Arc<AppState>>) -> PageResult {
    page(&state, "navegacion.html", context! {})
}

async fn contact_form(State(state): State<Arc<AppState>>) -> PageResult {
    page(&state, "contacto.html", context! {})
}

async fn registration_form(State(state): State<Arc<AppState>>) -> PageResult {
    page(&state, "registro.html", context! {})
}

async fn http_list_products(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ProductQuery>,
) -> PageResult {
    let listing = list_products(&state.api, q.category.as_deref());
    page(
        &state,
        "productos.html",
        context! {
            productos => listing.products,
            categorias => listing.categories,
            categoria_seleccionada => listing.selected_category,
        },
    )
}

async fn http_show_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> PageResult {
    match find_product(&state.api, ProductId(product_id)) {
        ProductLookup::Found { product } => page(
            &state,
            "producto_detalle.html",
            context! { producto => product },
        ),
        // Missing products are shown as a page with 200, not an HTTP error.
        ProductLookup::NotFound { message } => {
            page(&state, "error.html", context! { mensaje => message })
        }
    }
}

async fn http_list_users(State(state): State<Arc<AppState>>) -> PageResult {
    page(
        &state,
        "usuarios.html",
        context! { usuarios => list_users(&state.api) },
    )
}

async fn http_submit_contact(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ContactForm>,
) -> PageResult {
    let receipt = submit_contact(form);
    page(
        &state,
        "contacto_enviado.html",
        context! {
            nombre => receipt.name,
            email => receipt.email,
            mensaje => receipt.message,
        },
    )
}

async fn http_register_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistrationForm>,
) -> PageResult {
    let receipt = register_user(&state.api, form);
    page(
        &state,
        "registro_exitoso.html",
        context! { usuario => receipt.user },
    )
}

async fn http_search_products(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> PageResult {
    let outcome = search_products(&state.api, form);
    page(
        &state,
        "buscar_resultados.html",
        context! {
            resultados => outcome.results,
            termino => outcome.term,
            precio_min => outcome.min_price,
            precio_max => outcome.max_price,
        },
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
