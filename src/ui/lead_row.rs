use crate::api::links;
use crate::api::models::{Lead, LeadStatus};
use gtk4 as gtk;
use gtk4::prelude::*;
use std::rc::Rc;

pub type StatusHandler = Rc<dyn Fn(i64, LeadStatus)>;
pub type DeleteHandler = Rc<dyn Fn(i64)>;

fn field(text: &str, css: Option<&str>) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.set_halign(gtk::Align::Start);
    label.set_xalign(0.0);
    label.set_selectable(true);
    if let Some(css) = css {
        label.add_css_class(css);
    }
    label
}

/// One table row: contact details, message, status selector and actions.
pub fn lead_row(lead: &Lead, on_status: StatusHandler, on_delete: DeleteHandler) -> gtk::ListBoxRow {
    let row = gtk::ListBoxRow::new();
    row.set_activatable(false);

    let root = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    root.set_margin_top(8);
    root.set_margin_bottom(8);
    root.set_margin_start(8);
    root.set_margin_end(8);

    let info = gtk::Box::new(gtk::Orientation::Vertical, 2);
    info.set_hexpand(true);
    info.append(&field(lead.created_on(), Some("dim-label")));
    info.append(&field(&lead.name, Some("heading")));
    info.append(&field(&lead.email, None));
    info.append(&field(lead.phone().unwrap_or("—"), Some("dim-label")));
    let content = field(&lead.content, None);
    content.set_wrap(true);
    content.set_max_width_chars(60);
    info.append(&content);
    root.append(&info);

    let actions = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    actions.set_valign(gtk::Align::Center);

    let labels: Vec<&str> = LeadStatus::ALL.iter().map(|s| s.label()).collect();
    let selector = gtk::DropDown::from_strings(&labels);
    // Select before connecting so building the row does not fire a change.
    selector.set_selected(lead.status.index() as u32);
    let id = lead.id;
    selector.connect_selected_notify(move |dd| {
        if let Some(status) = LeadStatus::ALL.get(dd.selected() as usize) {
            on_status(id, *status);
        }
    });
    actions.append(&selector);

    match links::whatsapp_for_lead(lead) {
        Some(uri) => {
            let wa = gtk::LinkButton::with_label(&uri, "WhatsApp");
            wa.set_tooltip_text(Some("Open WhatsApp"));
            actions.append(&wa);
        }
        None => {
            let wa = gtk::Button::with_label("WhatsApp");
            wa.set_sensitive(false);
            wa.set_tooltip_text(Some("No Phone Number"));
            actions.append(&wa);
        }
    }

    let mail = gtk::LinkButton::with_label(&links::mailto_for_lead(lead), "Email");
    mail.set_tooltip_text(Some("Send Email"));
    actions.append(&mail);

    let delete = gtk::Button::from_icon_name("user-trash-symbolic");
    delete.add_css_class("destructive-action");
    delete.set_tooltip_text(Some("Delete Lead"));
    delete.connect_clicked(move |_| on_delete(id));
    actions.append(&delete);

    root.append(&actions);
    row.set_child(Some(&root));
    row
}
