use crate::api::models::Lead;
use url::form_urlencoded::byte_serialize;

pub const BUSINESS_NAME: &str = "Songbird Columbia";

/// Percent-encodes a query value, spaces as `%20` so `mailto:` clients
/// don't show literal plus signs.
fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Pre-filled WhatsApp chat with the lead. `None` when the lead left no
/// usable phone number.
pub fn whatsapp_for_lead(lead: &Lead) -> Option<String> {
    let number = digits(lead.phone()?);
    if number.is_empty() {
        return None;
    }
    let greeting = format!("Hi {}, I saw your inquiry on {BUSINESS_NAME}.", lead.name);
    Some(format!("https://wa.me/{number}?text={}", encode(&greeting)))
}

pub fn mailto_for_lead(lead: &Lead) -> String {
    let subject = format!("Response from {BUSINESS_NAME}");
    format!("mailto:{}?subject={}", lead.email.trim(), encode(&subject))
}

/// The general "chat with us" link shown on the landing window.
pub fn whatsapp_for_business(number: &str) -> String {
    let greeting = format!("Hi {BUSINESS_NAME}!");
    format!("https://wa.me/{}?text={}", digits(number), encode(&greeting))
}
