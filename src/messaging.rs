//! One-tap confirmation messages: builds a deep link to an external
//! messaging service with a pre-filled text for a given appointment.

use crate::agenda::format_display_date;
use crate::config::{APP_NAME, MESSAGING_COUNTRY_CODE};
use crate::error::AgendaError;
use crate::models::{digits_only, Appointment};

/// The pre-filled confirmation text.
pub fn confirmation_message(appointment: &Appointment) -> String {
    let date = format_display_date(&appointment.date);
    let when = if appointment.time.is_empty() {
        date
    } else {
        format!("{date} {}", appointment.time)
    };
    format!("Confirming your appointment on {when}. {APP_NAME}")
}

/// Deep link opening the messaging service with the confirmation text.
///
/// An appointment without a phone number is a validation failure; no link
/// is produced.
pub fn confirmation_link(appointment: &Appointment) -> Result<String, AgendaError> {
    let phone = digits_only(&appointment.phone);
    if phone.is_empty() {
        return Err(AgendaError::missing(&["phone"]));
    }
    let message = confirmation_message(appointment);
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Ok(format!(
        "https://wa.me/{MESSAGING_COUNTRY_CODE}{phone}?text={encoded}"
    ))
}
