use crate::api::LeadStatus;
use crate::app::AppContext;
use crate::filter::{StatusFilter, ViewFilter};
use crate::leads::{ConfirmedDelete, Followup, LeadBoard, LoadOutcome};
use crate::ui::lead_row::{lead_row, DeleteHandler, StatusHandler};
use adw::prelude::*;
use gtk4 as gtk;
use log::info;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this lead? This cannot be undone.";

/// One dashboard window. Its board and filter live and die with it, so
/// opening a new dashboard always starts from an empty state.
pub struct Dashboard {
    ctx: AppContext,
    window: adw::ApplicationWindow,
    overlay: adw::ToastOverlay,
    list: gtk::ListBox,
    placeholder: gtk::Label,
    spinner: gtk::Spinner,
    total: gtk::Label,
    pending: gtk::Label,
    won: gtk::Label,
    board: RefCell<LeadBoard>,
    filter: RefCell<ViewFilter>,
}

fn stat_card(title: &str) -> (gtk::Box, gtk::Label) {
    let card = gtk::Box::new(gtk::Orientation::Vertical, 4);
    card.add_css_class("card");
    card.set_hexpand(true);
    card.set_margin_top(4);
    card.set_margin_bottom(4);
    let caption = gtk::Label::new(Some(title));
    caption.add_css_class("dim-label");
    caption.set_margin_top(8);
    let value = gtk::Label::new(Some("0"));
    value.add_css_class("title-1");
    value.set_margin_bottom(8);
    card.append(&caption);
    card.append(&value);
    (card, value)
}

pub fn show_dashboard(ctx: &AppContext) {
    if !ctx.session.is_signed_in() {
        info!("no session, showing login");
        crate::ui::login::show_login_window(ctx);
        return;
    }
    let dashboard = Dashboard::build(ctx);
    dashboard.window.present();
    dashboard.refresh();
}

impl Dashboard {
    fn build(ctx: &AppContext) -> Rc<Self> {
        let window = adw::ApplicationWindow::builder()
            .application(&ctx.app)
            .title("Songbird CRM")
            .default_width(1080)
            .default_height(720)
            .build();

        let overlay = adw::ToastOverlay::new();

        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_top(12);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);

        let stats_row = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        let (total_card, total) = stat_card("Total Leads");
        let (pending_card, pending) = stat_card("Pending");
        let (won_card, won) = stat_card("Won");
        stats_row.append(&total_card);
        stats_row.append(&pending_card);
        stats_row.append(&won_card);
        root.append(&stats_row);

        let controls = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let search = gtk::SearchEntry::new();
        search.set_placeholder_text(Some("Search name, email, phone..."));
        search.set_hexpand(true);
        controls.append(&search);

        let chips = gtk::Box::new(gtk::Orientation::Horizontal, 4);
        chips.add_css_class("linked");
        let mut first: Option<gtk::ToggleButton> = None;
        let mut chip_buttons = Vec::new();
        for choice in StatusFilter::CHOICES {
            let chip = gtk::ToggleButton::with_label(choice.label());
            if let Some(leader) = first.as_ref() {
                chip.set_group(Some(leader));
            } else {
                chip.set_active(true);
                first = Some(chip.clone());
            }
            chips.append(&chip);
            chip_buttons.push((choice, chip));
        }
        controls.append(&chips);
        root.append(&controls);

        let spinner = gtk::Spinner::new();
        spinner.set_halign(gtk::Align::Center);
        root.append(&spinner);

        let placeholder = gtk::Label::new(Some("No leads found"));
        placeholder.add_css_class("dim-label");
        placeholder.set_wrap(true);
        placeholder.set_margin_top(24);
        root.append(&placeholder);

        let list = gtk::ListBox::new();
        list.add_css_class("boxed-list");
        list.set_selection_mode(gtk::SelectionMode::None);
        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .child(&list)
            .build();
        root.append(&scroller);

        overlay.set_child(Some(&root));

        let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
        let header = adw::HeaderBar::new();
        let title = gtk::Label::new(Some("Songbird CRM"));
        header.set_title_widget(Some(&title));
        let logout_btn = gtk::Button::with_label("Logout");
        header.pack_end(&logout_btn);
        let refresh_btn = gtk::Button::from_icon_name("view-refresh-symbolic");
        refresh_btn.set_tooltip_text(Some("Reload leads"));
        header.pack_start(&refresh_btn);
        container.append(&header);
        container.append(&overlay);
        window.set_content(Some(&container));

        let this = Rc::new(Self {
            ctx: ctx.clone(),
            window,
            overlay,
            list,
            placeholder,
            spinner,
            total,
            pending,
            won,
            board: RefCell::new(LeadBoard::new()),
            filter: RefCell::new(ViewFilter::default()),
        });

        // The window owns the only strong handle; closing it releases the
        // dashboard.
        {
            let keep = RefCell::new(Some(this.clone()));
            this.window.connect_close_request(move |_| {
                keep.borrow_mut().take();
                gtk::glib::Propagation::Proceed
            });
        }

        {
            let weak = Rc::downgrade(&this);
            search.connect_search_changed(move |entry| {
                if let Some(this) = weak.upgrade() {
                    this.filter.borrow_mut().set_search(&entry.text());
                    this.render();
                }
            });
        }

        for (choice, chip) in chip_buttons {
            let weak = Rc::downgrade(&this);
            chip.connect_toggled(move |chip| {
                if !chip.is_active() {
                    return;
                }
                if let Some(this) = weak.upgrade() {
                    this.filter.borrow_mut().status = choice;
                    this.render();
                }
            });
        }

        {
            let weak = Rc::downgrade(&this);
            refresh_btn.connect_clicked(move |_| {
                if let Some(this) = weak.upgrade() {
                    this.refresh();
                }
            });
        }

        {
            let weak = Rc::downgrade(&this);
            logout_btn.connect_clicked(move |_| {
                if let Some(this) = weak.upgrade() {
                    info!("logout requested");
                    this.ctx.session.clear_token();
                    this.to_login();
                }
            });
        }

        this
    }

    fn toast(&self, message: &str) {
        self.overlay.add_toast(adw::Toast::new(message));
    }

    /// Leaves the dashboard for the login window.
    fn to_login(&self) {
        crate::ui::login::show_login_window(&self.ctx);
        self.window.close();
    }

    /// Loads (or reloads) the full lead list from the server.
    fn refresh(self: &Rc<Self>) {
        let Some(token) = self.ctx.session.token() else {
            self.to_login();
            return;
        };
        self.board.borrow_mut().begin_load();
        self.render();

        let api = self.ctx.api.clone();
        let rx = crate::utils::run_async_to_main(async move { api.leads(&token).await });
        let weak = Rc::downgrade(self);
        rx.attach(None, move |res| {
            if let Some(this) = weak.upgrade() {
                let outcome = this.board.borrow_mut().absorb(res, &this.ctx.session);
                match outcome {
                    LoadOutcome::Ready => {
                        let notice = this.board.borrow().notice().map(str::to_string);
                        if let Some(notice) = notice {
                            this.toast(&notice);
                        }
                        this.render();
                    }
                    LoadOutcome::SignedOut => this.to_login(),
                }
            }
            glib::ControlFlow::Continue
        });
    }

    fn follow_up(self: &Rc<Self>, followup: Option<Followup>, what: &str) {
        match followup {
            None => {}
            Some(Followup::Resync) => {
                self.toast(&format!("{what} failed, reloading leads"));
                self.refresh();
            }
            Some(Followup::SignOut) => self.to_login(),
        }
    }

    fn change_status(self: &Rc<Self>, id: i64, status: LeadStatus) {
        let Some(change) = self.board.borrow_mut().begin_status_change(id, status) else {
            return;
        };
        // Re-render once the selector's signal has finished; the row that
        // emitted it may be replaced.
        let weak = Rc::downgrade(self);
        glib::idle_add_local_once(move || {
            if let Some(this) = weak.upgrade() {
                this.render();
            }
        });

        let Some(token) = self.ctx.session.token() else {
            self.to_login();
            return;
        };
        let api = self.ctx.api.clone();
        let rx = crate::utils::run_async_to_main(async move {
            api.update_status(&token, change.id, change.status).await
        });
        let weak = Rc::downgrade(self);
        rx.attach(None, move |res| {
            if let Some(this) = weak.upgrade() {
                let followup = this
                    .board
                    .borrow_mut()
                    .finish_status_change(change, res, &this.ctx.session);
                this.follow_up(followup, "Status update");
            }
            glib::ControlFlow::Continue
        });
    }

    fn confirm_delete(self: &Rc<Self>, id: i64) {
        let dialog = gtk::Dialog::builder()
            .title("Delete lead")
            .transient_for(&self.window)
            .modal(true)
            .build();
        let message = gtk::Label::new(Some(DELETE_CONFIRMATION));
        message.set_wrap(true);
        message.set_margin_top(12);
        message.set_margin_bottom(12);
        message.set_margin_start(12);
        message.set_margin_end(12);
        dialog.content_area().append(&message);

        let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
        let delete_btn = dialog.add_button("Delete", gtk::ResponseType::Accept);
        delete_btn.add_css_class("destructive-action");
        dialog.set_default_response(gtk::ResponseType::Cancel);

        let weak = Rc::downgrade(self);
        dialog.connect_response(move |dlg, resp| {
            if let Some(this) = weak.upgrade() {
                let accepted = resp == gtk::ResponseType::Accept;
                let confirmed = this.board.borrow().confirm_delete(id, accepted);
                if let Some(delete) = confirmed {
                    this.delete(delete);
                }
            }
            dlg.close();
        });
        dialog.present();
    }

    fn delete(self: &Rc<Self>, delete: ConfirmedDelete) {
        let Some(token) = self.ctx.session.token() else {
            self.to_login();
            return;
        };
        let api = self.ctx.api.clone();
        let rx = crate::utils::run_async_to_main(async move { api.delete_lead(&token, delete.id()).await });
        let weak = Rc::downgrade(self);
        rx.attach(None, move |res| {
            if let Some(this) = weak.upgrade() {
                let deleted = res.is_ok();
                let followup = this
                    .board
                    .borrow_mut()
                    .finish_delete(delete, res, &this.ctx.session);
                if deleted {
                    this.render();
                    this.toast("Lead deleted");
                }
                this.follow_up(followup, "Delete");
            }
            glib::ControlFlow::Continue
        });
    }

    fn handlers(self: &Rc<Self>) -> (StatusHandler, DeleteHandler) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let on_status: StatusHandler = Rc::new(move |id: i64, status: LeadStatus| {
            if let Some(this) = weak.upgrade() {
                this.change_status(id, status);
            }
        });
        let weak: Weak<Self> = Rc::downgrade(self);
        let on_delete: DeleteHandler = Rc::new(move |id: i64| {
            if let Some(this) = weak.upgrade() {
                this.confirm_delete(id);
            }
        });
        (on_status, on_delete)
    }

    /// Rebuilds stats and rows from the board and the current filter.
    fn render(self: &Rc<Self>) {
        let (on_status, on_delete) = self.handlers();
        let board = self.board.borrow();
        let filter = self.filter.borrow();

        let stats = board.stats();
        self.total.set_label(&stats.total.to_string());
        self.pending.set_label(&stats.pending.to_string());
        self.won.set_label(&stats.won.to_string());

        let loading = board.is_loading();
        self.spinner.set_visible(loading);
        self.spinner.set_spinning(loading);

        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        let visible = board.visible(&filter);
        for lead in &visible {
            self.list.append(&lead_row(lead, on_status.clone(), on_delete.clone()));
        }

        self.list.set_visible(!visible.is_empty());
        self.placeholder.set_visible(visible.is_empty() && !loading);
        self.placeholder
            .set_label(board.notice().unwrap_or("No leads found"));
    }
}
