use crate::models::Booking;

/// Business details needed to address the confirmation message.
pub struct BusinessContact<'a> {
    pub name: &'a str,
    pub chat_number: &'a str,
    pub currency_symbol: &'a str,
}

pub fn confirmation_message(business: &BusinessContact<'_>, booking: &Booking) -> String {
    format!(
        "Hello! I'd like to confirm my booking at {}:\n\n\
         *Client:* {}\n\
         *Services:* {}\n\
         *Date:* {}\n\
         *Time:* {}\n\n\
         *Total:* {} {:.2}",
        business.name,
        booking.client_name,
        booking.services.join(", "),
        booking.date.format("%d/%m/%Y"),
        booking.start_time.format("%H:%M"),
        business.currency_symbol,
        booking.total_cost,
    )
}

/// Deep link opening a chat with the business, prefilled with the booking
/// summary. `None` when no chat number is configured.
pub fn handoff_url(business: &BusinessContact<'_>, booking: &Booking) -> Option<String> {
    let number: String = business
        .chat_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if number.is_empty() {
        return None;
    }

    let base = format!("https://wa.me/{number}");
    let message = confirmation_message(business, booking);
    url::Url::parse_with_params(&base, &[("text", message.as_str())])
        .map(|u| u.to_string())
        .map_err(|e| tracing::warn!(error = %e, "failed to build hand-off url"))
        .ok()
}
