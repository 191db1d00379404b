use super::*;
use axum::{body, body::Body, http::Request, response::Response};
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        api: ApiContext::default(),
        renderer: Renderer::new("Tienda de prueba").expect("renderer"),
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").into(),
    })
}

fn test_app() -> (Router, ApiContext) {
    let state = test_state();
    let api = state.api.clone();
    (build_router(state), api)
}

async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    (status, body_text(response).await)
}

async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, String) {
    let request = Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    (status, body_text(response).await)
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _api) = test_app();
    let (status, body) = get_page(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn fixed_pages_render() {
    let (app, _api) = test_app();
    for uri in ["/", "/navegacion", "/contacto", "/registro", "/usuarios"] {
        let (status, body) = get_page(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.contains("Tienda de prueba"), "{uri}");
    }
    let (_, home) = get_page(&app, "/").await;
    assert!(home.contains(HOME_TITLE));
}

#[tokio::test]
async fn product_listing_filters_by_category_ignoring_case() {
    let (app, _api) = test_app();

    let (status, all) = get_page(&app, "/productos").await;
    assert_eq!(status, StatusCode::OK);
    for name in ["Portátil", "Mesa", "Libro"] {
        assert!(all.contains(name), "missing {name}");
    }

    let (status, muebles) = get_page(&app, "/productos?categoria=MUEBLES").await;
    assert_eq!(status, StatusCode::OK);
    assert!(muebles.contains("/producto/2"));
    assert!(!muebles.contains("/producto/1\""));
    assert!(!muebles.contains("/producto/3\""));
    // The category selector always lists the full catalog.
    assert!(muebles.contains("Educación"));

    let (status, none) = get_page(&app, "/productos?categoria=juguetes").await;
    assert_eq!(status, StatusCode::OK);
    assert!(none.contains("No hay productos"));
}

#[tokio::test]
async fn padded_or_blank_category_matches_nothing() {
    let (app, _api) = test_app();
    for uri in ["/productos?categoria=%20Muebles%20", "/productos?categoria=%20%20"] {
        let (status, body) = get_page(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.contains("No hay productos"), "{uri}");
        assert!(!body.contains("/producto/2\""), "{uri}");
    }

    let (status, body) = get_page(&app, "/productos?categoria=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/producto/3\""));
}

#[tokio::test]
async fn product_detail_and_not_found_page() {
    let (app, _api) = test_app();

    let (status, body) = get_page(&app, "/producto/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Portátil"));
    assert!(body.contains("899.99"));

    let (status, body) = get_page(&app, "/producto/999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Producto con ID 999 no encontrado"));
}

#[tokio::test]
async fn non_integer_product_id_is_rejected() {
    let (app, _api) = test_app();
    let (status, _) = get_page(&app, "/producto/portatil").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn search_applies_term_and_price_bounds() {
    let (app, _api) = test_app();

    let (status, body) = post_form(&app, "/buscar", "termino=a").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Portátil"));
    assert!(body.contains("Mesa"));
    assert!(!body.contains("Libro"));

    let (status, body) =
        post_form(&app, "/buscar", "termino=a&precio_min=&precio_max=500").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Mesa"));
    assert!(!body.contains("Portátil"));

    let (status, body) = post_form(&app, "/buscar", "termino=a&precio_min=5000").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No se encontraron productos"));
}

#[tokio::test]
async fn search_without_term_or_with_bad_price_is_rejected() {
    let (app, _api) = test_app();
    let (status, _) = post_form(&app, "/buscar", "precio_min=10").await;
    assert!(status.is_client_error());
    let (status, _) = post_form(&app, "/buscar", "termino=a&precio_max=caro").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn registration_appends_users_visible_in_listing() {
    let (app, api) = test_app();

    let (status, body) = post_form(
        &app,
        "/registro",
        "nombre=Ana&email=ana%40example.com&edad=31&ciudad=Madrid&intereses=lectura",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ana"));

    let (status, body) = post_form(
        &app,
        "/registro",
        "nombre=Luis&email=luis%40example.com&edad=45&ciudad=Sevilla&intereses=deporte&intereses=viajes",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("deporte, viajes"));

    let users = api.storage.list_users();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id.0, 1);
    assert_eq!(users[0].interests, vec!["lectura"]);
    assert_eq!(users[1].id.0, 2);
    assert_eq!(users[1].interests, vec!["deporte", "viajes"]);

    let (status, listing) = get_page(&app, "/usuarios").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing.contains("ana@example.com"));
    assert!(listing.contains("luis@example.com"));
    assert!(listing.find("Ana") < listing.find("Luis"));
}

#[tokio::test]
async fn registration_with_bad_age_stores_nothing() {
    let (app, api) = test_app();
    let (status, _) = post_form(
        &app,
        "/registro",
        "nombre=Ana&email=a&edad=treinta&ciudad=Madrid&intereses=cine",
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(api.storage.user_count(), 0);
}

#[tokio::test]
async fn contact_echoes_fields_without_storing() {
    let (app, api) = test_app();
    let (status, body) = post_form(
        &app,
        "/contacto",
        "nombre=Marta&email=marta%40example.com&mensaje=Hola+equipo",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Marta"));
    assert!(body.contains("marta@example.com"));
    assert!(body.contains("Hola equipo"));
    assert_eq!(api.storage.user_count(), 0);

    let (status, _) = post_form(&app, "/contacto", "nombre=Marta").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn serves_static_stylesheet() {
    let (app, _api) = test_app();
    let (status, body) = get_page(&app, "/static/css/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("font-family"));
}

async fn page_with_unknown_template(State(state): State<Arc<AppState>>) -> PageResult {
    page(&state, "no_existe.html", context! {})
}

#[tokio::test]
async fn render_failure_uses_error_page_with_500() {
    let state = test_state();
    let app = build_router(state.clone()).merge(
        Router::new()
            .route("/roto", get(page_with_unknown_template))
            .with_state(state),
    );

    let (status, body) = get_page(&app, "/roto").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(RENDER_FAILURE_MESSAGE));
    assert!(body.contains("no_existe.html"));
    assert!(body.contains("Tienda de prueba"));
}
