use crate::api::ApiClient;
use crate::config::Settings;
use crate::session::{MemoryTokenStore, Session, TokenStore};
use crate::storage::FileTokenStore;
use adw::Application;
use log::{info, warn};
use std::sync::Arc;

/// Everything a screen needs, handed down explicitly. Cloning is cheap
/// and clones share the same session.
#[derive(Clone)]
pub struct AppContext {
    pub app: Application,
    pub settings: Settings,
    pub api: ApiClient,
    pub session: Session,
}

impl AppContext {
    pub fn load(app: &Application) -> Self {
        if let Some(path) = Settings::config_path() {
            match Settings::write_defaults_if_missing(&path) {
                Ok(true) => info!("wrote default settings to {}", path.display()),
                Ok(false) => {}
                Err(e) => warn!("could not write default settings: {e}"),
            }
        }
        let settings = Settings::load();
        info!("using API at {}", settings.api_url);

        let store: Arc<dyn TokenStore> = match FileTokenStore::default_location() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("{e}; the session will not survive a restart");
                Arc::new(MemoryTokenStore::new())
            }
        };

        Self {
            app: app.clone(),
            api: ApiClient::new(&settings.api_url),
            session: Session::open(store),
            settings,
        }
    }
}

pub fn build_ui(ctx: &AppContext) {
    crate::ui::landing::show_landing_window(ctx);
}

/// Admin entry point: the dashboard itself bounces to login when there is
/// no session.
pub fn open_admin(ctx: &AppContext) {
    crate::ui::dashboard::show_dashboard(ctx);
}
