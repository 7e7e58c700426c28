use crate::app::AppContext;
use crate::auth::{self, LoginFailure};
use adw::prelude::*;
use gtk4 as gtk;
use log::warn;
use std::rc::Rc;

pub fn show_login_window(ctx: &AppContext) {
    let window = adw::ApplicationWindow::builder()
        .application(&ctx.app)
        .title("Songbird Admin Login")
        .default_width(420)
        .default_height(300)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Admin Access"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let user_entry = gtk::Entry::new();
    user_entry.set_placeholder_text(Some("Enter username"));
    user_entry.set_hexpand(true);

    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("••••••••"));
    pass_entry.set_show_peek_icon(true);
    pass_entry.set_hexpand(true);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&user_entry);
    form.append(&pass_entry);
    root.append(&form);

    // Inline error, also used for progress.
    let status = gtk::Label::new(None);
    status.set_wrap(true);
    status.set_xalign(0.0);
    root.append(&status);

    let login_btn = gtk::Button::with_label("Sign In");
    login_btn.add_css_class("suggested-action");
    login_btn.set_halign(gtk::Align::End);
    root.append(&login_btn);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let header_title = gtk::Label::new(Some("Songbird Columbia"));
    header.set_title_widget(Some(&header_title));
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    let on_sign_in = {
        let ctx = ctx.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let user_entry = user_entry.clone();
        let pass_entry = pass_entry.clone();
        let login_btn = login_btn.clone();
        move || {
            let username = user_entry.text().to_string();
            let password = pass_entry.text().to_string();
            if username.trim().is_empty() || password.is_empty() {
                overlay.add_toast(adw::Toast::new("Please enter username and password."));
                return;
            }

            status.remove_css_class("error");
            status.add_css_class("dim-label");
            status.set_label("Signing in…");
            login_btn.set_sensitive(false);

            let api = ctx.api.clone();
            let session = ctx.session.clone();
            let rx = crate::utils::run_async_to_main(async move {
                auth::sign_in(&api, &session, &username, &password).await
            });

            let ctx = ctx.clone();
            let window = window.clone();
            let status = status.clone();
            let login_btn = login_btn.clone();
            rx.attach(None, move |res| {
                match res {
                    // Start the dashboard from scratch; the login window
                    // and anything it held goes away.
                    Ok(()) => {
                        crate::ui::dashboard::show_dashboard(&ctx);
                        window.close();
                    }
                    Err(LoginFailure::Storage(e)) => {
                        warn!("session will not survive a restart: {e}");
                        crate::ui::dashboard::show_dashboard(&ctx);
                        window.close();
                    }
                    Err(failure) => {
                        status.remove_css_class("dim-label");
                        status.add_css_class("error");
                        status.set_label(&failure.to_string());
                        login_btn.set_sensitive(true);
                    }
                }
                glib::ControlFlow::Continue
            });
        }
    };

    let on_sign_in: Rc<dyn Fn()> = Rc::new(on_sign_in);
    {
        let on_sign_in = on_sign_in.clone();
        login_btn.connect_clicked(move |_| (on_sign_in)());
    }
    {
        let on_sign_in = on_sign_in.clone();
        user_entry.connect_activate(move |_| (on_sign_in)());
    }
    {
        let on_sign_in = on_sign_in.clone();
        pass_entry.connect_activate(move |_| (on_sign_in)());
    }

    window.present();
}
