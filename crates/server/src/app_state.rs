use std::path::PathBuf;

use server_api::ApiContext;

use crate::render::Renderer;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) renderer: Renderer,
    pub(crate) static_dir: PathBuf,
}
