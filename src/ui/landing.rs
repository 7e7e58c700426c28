use crate::api::links;
use crate::app::AppContext;
use crate::contact::{ContactDraft, ContactForm, SubmitPhase, SUCCESS_RESET};
use adw::prelude::*;
use gtk4 as gtk;
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;

const SERVICES: [(&str, &str); 6] = [
    ("Strategy", "Clear structure and hierarchy for maximum impact."),
    ("Custom Design", "Clean and modern UI tailored to your brand."),
    ("Responsive", "Perfect viewing on mobile, tablet, and desktop."),
    ("CTA Optimization", "Strategically designed to drive contact and sales."),
    ("Fast Delivery", "High-quality turnaround in just a few days."),
    ("Revisions", "We iterate together until it’s exactly right."),
];

const FAQ: [(&str, &str); 4] = [
    ("Why only landing pages?", "Because focus converts. A single goal yields better results."),
    ("Is $300 final?", "Yes, it's a flat price for a professional landing page."),
    ("Do you offer revisions?", "Yes, we iterate until you're happy with the result."),
    ("Who do I talk to?", "You talk directly with the builder of your site."),
];

fn section_title(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("title-3");
    label.set_halign(gtk::Align::Start);
    label.set_margin_top(12);
    label
}

fn entry(placeholder: &str) -> gtk::Entry {
    let entry = gtk::Entry::new();
    entry.set_placeholder_text(Some(placeholder));
    entry.set_hexpand(true);
    entry
}

/// Widgets of the contact section, kept together so the submit handler can
/// read and clear them.
#[derive(Clone)]
struct ContactFields {
    name: gtk::Entry,
    email: gtk::Entry,
    phone: gtk::Entry,
    content: gtk::TextView,
    send: gtk::Button,
    status: gtk::Label,
}

impl ContactFields {
    fn draft(&self) -> ContactDraft {
        let buffer = self.content.buffer();
        ContactDraft {
            name: self.name.text().to_string(),
            email: self.email.text().to_string(),
            phone: self.phone.text().to_string(),
            content: buffer.text(&buffer.start_iter(), &buffer.end_iter(), false).to_string(),
        }
    }

    fn clear(&self) {
        self.name.set_text("");
        self.email.set_text("");
        self.phone.set_text("");
        self.content.buffer().set_text("");
    }

    fn show(&self, phase: SubmitPhase) {
        let (text, css) = match phase {
            SubmitPhase::Idle => ("", "dim-label"),
            SubmitPhase::Sending => ("Sending…", "dim-label"),
            SubmitPhase::Success => ("Message sent! We'll get back to you soon.", "success"),
            SubmitPhase::Error => ("Something went wrong. Please try again or reach us on WhatsApp.", "error"),
        };
        for class in ["dim-label", "success", "error"] {
            self.status.remove_css_class(class);
        }
        self.status.add_css_class(css);
        self.status.set_label(text);
        self.send.set_sensitive(phase.accepts_submit());
        self.send
            .set_label(if phase == SubmitPhase::Sending { "Sending…" } else { "Send Message" });
    }
}

fn contact_section(fields: &ContactFields, whatsapp_uri: &str) -> gtk::Box {
    let section = gtk::Box::new(gtk::Orientation::Vertical, 8);
    section.append(&section_title("Contact"));

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&fields.name);
    form.append(&fields.email);
    form.append(&fields.phone);

    fields.content.set_wrap_mode(gtk::WrapMode::WordChar);
    fields.content.set_vexpand(false);
    let scroller = gtk::ScrolledWindow::builder()
        .min_content_height(96)
        .child(&fields.content)
        .build();
    scroller.add_css_class("card");
    form.append(&scroller);
    section.append(&form);

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    buttons.set_halign(gtk::Align::End);
    let whatsapp = gtk::LinkButton::with_label(whatsapp_uri, "Chat on WhatsApp");
    buttons.append(&whatsapp);
    fields.send.add_css_class("suggested-action");
    buttons.append(&fields.send);
    section.append(&buttons);

    fields.status.set_wrap(true);
    fields.status.set_xalign(0.0);
    section.append(&fields.status);
    section
}

pub fn show_landing_window(ctx: &AppContext) {
    let window = adw::ApplicationWindow::builder()
        .application(&ctx.app)
        .title("Songbird Columbia")
        .default_width(720)
        .default_height(760)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let kicker = gtk::Label::new(Some("Landing Pages for US Businesses"));
    kicker.add_css_class("dim-label");
    kicker.set_halign(gtk::Align::Start);
    root.append(&kicker);
    let hero = gtk::Label::new(Some("Conversion-Focused Landing Pages"));
    hero.add_css_class("title-1");
    hero.set_halign(gtk::Align::Start);
    root.append(&hero);
    let pitch = gtk::Label::new(Some(
        "Songbird Columbia builds landing pages designed to turn visitors into real customers. One page. One goal. Flat pricing.",
    ));
    pitch.set_wrap(true);
    pitch.set_xalign(0.0);
    root.append(&pitch);

    root.append(&section_title("Services"));
    let services = gtk::FlowBox::new();
    services.set_selection_mode(gtk::SelectionMode::None);
    services.set_max_children_per_line(3);
    services.set_column_spacing(8);
    services.set_row_spacing(8);
    for (name, desc) in SERVICES {
        let card = gtk::Box::new(gtk::Orientation::Vertical, 4);
        card.add_css_class("card");
        let title = gtk::Label::new(Some(name));
        title.add_css_class("heading");
        title.set_margin_top(8);
        let body = gtk::Label::new(Some(desc));
        body.set_wrap(true);
        body.set_max_width_chars(24);
        body.set_margin_start(8);
        body.set_margin_end(8);
        body.set_margin_bottom(8);
        card.append(&title);
        card.append(&body);
        services.insert(&card, -1);
    }
    root.append(&services);

    root.append(&section_title("FAQ"));
    for (question, answer) in FAQ {
        let expander = gtk::Expander::new(Some(question));
        let body = gtk::Label::new(Some(answer));
        body.set_wrap(true);
        body.set_xalign(0.0);
        body.set_margin_start(16);
        expander.set_child(Some(&body));
        root.append(&expander);
    }

    let fields = ContactFields {
        name: entry("Your name"),
        email: entry("Email address"),
        phone: entry("Phone number"),
        content: gtk::TextView::new(),
        send: gtk::Button::with_label("Send Message"),
        status: gtk::Label::new(None),
    };
    fields.email.set_input_purpose(gtk::InputPurpose::Email);
    fields.phone.set_input_purpose(gtk::InputPurpose::Phone);
    let whatsapp_uri = links::whatsapp_for_business(&ctx.settings.whatsapp_number);
    root.append(&contact_section(&fields, &whatsapp_uri));

    let scroller = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hscrollbar_policy(gtk::PolicyType::Never)
        .child(&root)
        .build();
    toast_overlay.set_child(Some(&scroller));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some("Songbird Columbia"));
    header.set_title_widget(Some(&title));
    let admin_btn = gtk::Button::with_label("Admin");
    admin_btn.set_tooltip_text(Some("Lead dashboard"));
    header.pack_end(&admin_btn);
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    {
        let ctx = ctx.clone();
        admin_btn.connect_clicked(move |_| crate::app::open_admin(&ctx));
    }

    let form = Rc::new(RefCell::new(ContactForm::new()));
    {
        let api = ctx.api.clone();
        let overlay = toast_overlay.clone();
        let fields_for_send = fields.clone();
        fields.send.connect_clicked(move |_| {
            let fields = fields_for_send.clone();
            let request = {
                let mut form = form.borrow_mut();
                form.draft = fields.draft();
                form.begin_submit()
            };
            let request = match request {
                Ok(request) => request,
                Err(e) => {
                    overlay.add_toast(adw::Toast::new(&format!("Please check the form: {e}")));
                    return;
                }
            };
            fields.show(SubmitPhase::Sending);

            let api = api.clone();
            let rx = crate::utils::run_async_to_main(async move { api.submit_contact(&request).await });
            let form = form.clone();
            rx.attach(None, move |res| {
                let accepted = match res {
                    Ok(()) => {
                        info!("contact message accepted");
                        true
                    }
                    Err(e) => {
                        error!("contact message failed: {e}");
                        false
                    }
                };
                let phase = form.borrow_mut().finish(accepted);
                if phase == SubmitPhase::Success {
                    fields.clear();
                    let form = form.clone();
                    let fields = fields.clone();
                    glib::timeout_add_local_once(SUCCESS_RESET, move || {
                        let phase = form.borrow_mut().settle();
                        fields.show(phase);
                    });
                }
                fields.show(phase);
                glib::ControlFlow::Continue
            });
        });
    }

    window.present();
}
