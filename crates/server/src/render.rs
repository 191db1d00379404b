use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;
use shared::error::PageException;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("inicio.html", include_str!("../templates/inicio.html")),
    ("navegacion.html", include_str!("../templates/navegacion.html")),
    ("productos.html", include_str!("../templates/productos.html")),
    ("producto_detalle.html", include_str!("../templates/producto_detalle.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("contacto.html", include_str!("../templates/contacto.html")),
    ("contacto_enviado.html", include_str!("../templates/contacto_enviado.html")),
    ("registro.html", include_str!("../templates/registro.html")),
    ("registro_exitoso.html", include_str!("../templates/registro_exitoso.html")),
    ("usuarios.html", include_str!("../templates/usuarios.html")),
    ("buscar_resultados.html", include_str!("../templates/buscar_resultados.html")),
];

/// Template environment shared by every handler.
#[derive(Clone)]
pub struct Renderer {
    env: Arc<Environment<'static>>,
}

impl Renderer {
    pub fn new(site_title: &str) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_global("site_title", site_title.to_string());
        env.add_filter("price", format_price);
        Ok(Self { env: Arc::new(env) })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, PageException> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| PageException::MissingTemplate {
                template: name.to_string(),
                message: e.to_string(),
            })?;
        template.render(ctx).map_err(|e| PageException::Render {
            template: name.to_string(),
            message: e.to_string(),
        })
    }
}

fn format_price(value: f64) -> String {
    format!("{value:.2} €")
}
