use adw::prelude::*;
use adw::Application;
use songbird_desk::app::{self, AppContext};

fn main() -> adw::glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = Application::builder()
        .application_id("com.songbirdcolumbia.Desk")
        .build();
    app.connect_activate(|app| {
        let ctx = AppContext::load(app);
        app::build_ui(&ctx);
    });
    app.run()
}
