//! Admin notification payloads and the Telegram dispatcher.
//!
//! Every state change in the order ledger produces a typed notice. Notices
//! are rendered to Telegram HTML and dispatched asynchronously; delivery is
//! best-effort and never affects the request that triggered it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Strips formatting characters from a contact number and prefixes the
/// Malaysian country code, matching the `wa.me` URL scheme.
pub fn whatsapp_number(contact_number: &str) -> String {
    let digits: String = contact_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with('6') {
        digits
    } else {
        format!("6{}", digits)
    }
}

/// Builds a `wa.me` deep link, optionally with a prefilled message.
pub fn whatsapp_link(contact_number: &str, message: Option<&str>) -> String {
    let base = format!("https://wa.me/{}", whatsapp_number(contact_number));
    match message {
        Some(text) => format!("{}?text={}", base, urlencoding::encode(text)),
        None => base,
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// One line per reserved item, used in reservation and item-edit notices.
#[derive(Debug, Clone)]
pub struct NoticeLine {
    pub product_name: String,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone)]
pub struct ReservationNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub postcode: String,
    pub state: String,
    pub lines: Vec<NoticeLine>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total_price: Decimal,
    pub payment_link: String,
    pub at: DateTime<Utc>,
}

impl ReservationNotice {
    pub fn text(&self) -> String {
        let mut lines = self.lines.clone();
        lines.sort_by(|a, b| b.quantity.cmp(&a.quantity));

        let mut msg = String::from("<b>NEW ORDER RESERVATION</b>\n\n");
        msg.push_str(&format!("Order: {}\n", self.code));
        msg.push_str(&format!("Customer: {}\n", escape_html(&self.customer_name)));
        msg.push_str(&format!("WhatsApp: +{}\n", whatsapp_number(&self.contact_number)));
        msg.push_str(&format!(
            "Address: {} {}\n\n",
            escape_html(&self.postcode),
            escape_html(&self.state)
        ));

        msg.push_str("<b>Items reserved:</b>\n");
        for (i, line) in lines.iter().enumerate() {
            msg.push_str(&format!(
                "{}. {} - {} qty (RM{:.2})\n",
                i + 1,
                escape_html(&line.product_name),
                line.quantity,
                line.line_total
            ));
        }

        msg.push_str(&format!("\nSubtotal: RM{:.2}\n", self.subtotal));
        msg.push_str(&format!("Shipping: RM{:.2}\n", self.shipping_fee));
        msg.push_str(&format!("Total: RM{:.2}\n\n", self.total_price));

        let wa_text = format!(
            "Hi {}, your order {} for RM{:.2} is ready for payment. Please use this link: {}",
            self.customer_name, self.code, self.total_price, self.payment_link
        );
        msg.push_str(&format!(
            "Contact customer: {}\n",
            whatsapp_link(&self.contact_number, Some(&wa_text))
        ));
        msg.push_str(&timestamp(self.at));
        msg
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSubmittedNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub total_price: Decimal,
    pub payment_method: String,
    pub receipt_filename: String,
    pub at: DateTime<Utc>,
}

impl PaymentSubmittedNotice {
    pub fn text(&self) -> String {
        format!(
            "<b>PAYMENT SUBMITTED</b>\n\nOrder: {}\nCustomer: {}\nWhatsApp: +{}\nAmount: RM{:.2}\nMethod: {}\nReceipt: {}\n\n{}",
            self.code,
            escape_html(&self.customer_name),
            whatsapp_number(&self.contact_number),
            self.total_price,
            escape_html(&self.payment_method),
            escape_html(&self.receipt_filename),
            timestamp(self.at)
        )
    }
}

#[derive(Debug, Clone)]
pub struct PaymentVerifiedNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub total_price: Decimal,
    pub verified_by: String,
    pub at: DateTime<Utc>,
}

impl PaymentVerifiedNotice {
    /// Message the admin forwards to the customer over WhatsApp.
    pub fn customer_message(&self) -> String {
        format!(
            "Hi {}, your payment for Order {} has been verified. We will proceed with shipping within 3 working days. Thank you!",
            self.customer_name, self.code
        )
    }

    pub fn text(&self) -> String {
        let wa_text = self.customer_message();
        format!(
            "<b>PAYMENT VERIFIED</b>\n\nOrder: {}\nCustomer: {}\nAmount: RM{:.2}\nVerified by: {}\n\nWhatsApp message to send:\n{}\n\n{}\n\n{}",
            self.code,
            escape_html(&self.customer_name),
            self.total_price,
            escape_html(&self.verified_by),
            escape_html(&wa_text),
            whatsapp_link(&self.contact_number, Some(&wa_text)),
            timestamp(self.at)
        )
    }
}

#[derive(Debug, Clone)]
pub struct PaymentRejectedNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub total_price: Decimal,
    pub reason: String,
    pub rejected_by: String,
    pub at: DateTime<Utc>,
}

impl PaymentRejectedNotice {
    pub fn customer_message(&self) -> String {
        format!(
            "Hi {}, your payment for Order {} was rejected. Reason: {}. Please contact us for assistance.",
            self.customer_name, self.code, self.reason
        )
    }

    pub fn text(&self) -> String {
        let wa_text = self.customer_message();
        format!(
            "<b>PAYMENT REJECTED</b>\n\nOrder: {}\nCustomer: {}\nAmount: RM{:.2}\nReason: {}\nRejected by: {}\n\nWhatsApp message to send:\n{}\n\n{}\n\n{}",
            self.code,
            escape_html(&self.customer_name),
            self.total_price,
            escape_html(&self.reason),
            escape_html(&self.rejected_by),
            escape_html(&wa_text),
            whatsapp_link(&self.contact_number, Some(&wa_text)),
            timestamp(self.at)
        )
    }
}

#[derive(Debug, Clone)]
pub struct PaymentLinkNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub total_price: Decimal,
    pub payment_link: String,
}

impl PaymentLinkNotice {
    pub fn text(&self) -> String {
        format!(
            "<b>PAYMENT LINK GENERATED</b>\n\nOrder: {}\nCustomer: {}\nWhatsApp: +{}\nAmount: RM{:.2}\n\nPayment link: {}\nWhatsApp customer: {}",
            self.code,
            escape_html(&self.customer_name),
            whatsapp_number(&self.contact_number),
            self.total_price,
            self.payment_link,
            whatsapp_link(&self.contact_number, None)
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrderShippedNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub tracking_number: String,
    pub at: DateTime<Utc>,
}

impl OrderShippedNotice {
    pub fn text(&self) -> String {
        format!(
            "<b>ORDER SHIPPED</b>\n\nOrder: {}\nCustomer: {}\nWhatsApp: +{}\nTracking: {}\n{}",
            self.code,
            escape_html(&self.customer_name),
            whatsapp_number(&self.contact_number),
            escape_html(&self.tracking_number),
            timestamp(self.at)
        )
    }
}

/// Covers the completed, cancelled, and deleted admin actions, which share a
/// layout and differ only in heading and actor label.
#[derive(Debug, Clone)]
pub struct OrderActionNotice {
    pub heading: &'static str,
    pub actor_label: &'static str,
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub total_price: Decimal,
    pub actor: String,
    pub at: DateTime<Utc>,
}

impl OrderActionNotice {
    pub fn completed(
        code: String,
        customer_name: String,
        contact_number: String,
        total_price: Decimal,
        actor: String,
    ) -> Self {
        Self {
            heading: "ORDER COMPLETED",
            actor_label: "Completed by",
            code,
            customer_name,
            contact_number,
            total_price,
            actor,
            at: Utc::now(),
        }
    }

    pub fn cancelled(
        code: String,
        customer_name: String,
        contact_number: String,
        total_price: Decimal,
        actor: String,
    ) -> Self {
        Self {
            heading: "ORDER CANCELLED",
            actor_label: "Cancelled by",
            code,
            customer_name,
            contact_number,
            total_price,
            actor,
            at: Utc::now(),
        }
    }

    pub fn deleted(
        code: String,
        customer_name: String,
        contact_number: String,
        total_price: Decimal,
        actor: String,
    ) -> Self {
        Self {
            heading: "ORDER DELETED",
            actor_label: "Deleted by",
            code,
            customer_name,
            contact_number,
            total_price,
            actor,
            at: Utc::now(),
        }
    }

    pub fn text(&self) -> String {
        format!(
            "<b>{}</b>\n\nOrder: {}\nCustomer: {}\nWhatsApp: +{}\nAmount: RM{:.2}\n{}: {}\n{}",
            self.heading,
            self.code,
            escape_html(&self.customer_name),
            whatsapp_number(&self.contact_number),
            self.total_price,
            self.actor_label,
            escape_html(&self.actor),
            timestamp(self.at)
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrderUpdatedNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub postcode: String,
    pub state: String,
    pub status: String,
    pub payment_status: String,
    pub updated_by: String,
    pub at: DateTime<Utc>,
}

impl OrderUpdatedNotice {
    pub fn text(&self) -> String {
        format!(
            "<b>ORDER UPDATED</b>\n\nOrder: {}\nCustomer: {}\nWhatsApp: +{}\nAddress: {} {}\nStatus: {}\nPayment status: {}\nUpdated by: {}\n{}",
            self.code,
            escape_html(&self.customer_name),
            whatsapp_number(&self.contact_number),
            escape_html(&self.postcode),
            escape_html(&self.state),
            self.status,
            self.payment_status,
            escape_html(&self.updated_by),
            timestamp(self.at)
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemsEditedNotice {
    pub code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub new_total: Decimal,
    pub lines: Vec<NoticeLine>,
    pub updated_by: String,
    pub at: DateTime<Utc>,
}

impl OrderItemsEditedNotice {
    pub fn text(&self) -> String {
        let mut msg = String::from("<b>ORDER ITEMS UPDATED</b>\n\n");
        msg.push_str(&format!("Order: {}\n", self.code));
        msg.push_str(&format!("Customer: {}\n", escape_html(&self.customer_name)));
        msg.push_str(&format!("Phone: +{}\n", whatsapp_number(&self.contact_number)));
        msg.push_str(&format!("New total: RM{:.2}\n", self.new_total));
        msg.push_str(&format!("Items: {}\n", self.lines.len()));
        msg.push_str(&format!("Updated by: {}\n\n", escape_html(&self.updated_by)));

        if !self.lines.is_empty() {
            msg.push_str("<b>Updated items:</b>\n");
            for (i, line) in self.lines.iter().enumerate() {
                msg.push_str(&format!(
                    "{}. {} - {} qty (RM{:.2})\n",
                    i + 1,
                    escape_html(&line.product_name),
                    line.quantity,
                    line.line_total
                ));
            }
        }

        msg.push('\n');
        msg.push_str(&timestamp(self.at));
        msg
    }
}

/// Sends rendered notices to a Telegram chat via the Bot API.
///
/// Construction without credentials yields a disabled dispatcher that logs
/// and drops every message. Send failures of any kind are logged at `warn`
/// and swallowed.
#[derive(Debug, Clone)]
pub struct TelegramDispatcher {
    client: reqwest::Client,
    endpoint: Option<String>,
    chat_id: Option<String>,
}

impl TelegramDispatcher {
    pub fn new(
        bot_token: Option<String>,
        chat_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        let endpoint = bot_token
            .filter(|t| !t.is_empty())
            .map(|t| format!("https://api.telegram.org/bot{}/sendMessage", t));
        Self {
            client,
            endpoint,
            chat_id: chat_id.filter(|c| !c.is_empty()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, None, Duration::from_secs(5))
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some() && self.chat_id.is_some()
    }

    pub async fn send(&self, text: &str) {
        let (Some(endpoint), Some(chat_id)) = (&self.endpoint, &self.chat_id) else {
            debug!("Telegram dispatch disabled; dropping notification");
            return;
        };

        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        match self.client.post(endpoint).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Telegram notification sent");
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "Telegram notification rejected");
            }
            Err(err) => {
                warn!(error = %err, "Telegram notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whatsapp_number_adds_country_code_once() {
        assert_eq!(whatsapp_number("0123456789"), "60123456789");
        assert_eq!(whatsapp_number("60123456789"), "60123456789");
        assert_eq!(whatsapp_number("+60 12-345 6789"), "60123456789");
    }

    #[test]
    fn whatsapp_link_encodes_message() {
        let link = whatsapp_link("0123456789", Some("Hi there, order EF1234"));
        assert!(link.starts_with("https://wa.me/60123456789?text="));
        assert!(link.contains("Hi%20there%2C%20order%20EF1234"));

        assert_eq!(whatsapp_link("0123456789", None), "https://wa.me/60123456789");
    }

    #[test]
    fn reservation_notice_sorts_lines_by_quantity() {
        let notice = ReservationNotice {
            code: "EF1234".into(),
            customer_name: "Aisha".into(),
            contact_number: "0123456789".into(),
            postcode: "40000".into(),
            state: "Selangor".into(),
            lines: vec![
                NoticeLine {
                    product_name: "Crispy crab stick".into(),
                    quantity: 1,
                    line_total: dec!(16.00),
                },
                NoticeLine {
                    product_name: "Chicken floss roll".into(),
                    quantity: 3,
                    line_total: dec!(75.00),
                },
            ],
            subtotal: dec!(91.00),
            shipping_fee: dec!(7.00),
            total_price: dec!(98.00),
            payment_link: "http://localhost:8080/payment/EF1234".into(),
            at: Utc::now(),
        };

        let text = notice.text();
        let floss = text.find("1. Chicken floss roll").unwrap();
        let crab = text.find("2. Crispy crab stick").unwrap();
        assert!(floss < crab);
        assert!(text.contains("Total: RM98.00"));
    }

    #[test]
    fn notices_escape_html_in_user_input() {
        let notice = PaymentSubmittedNotice {
            code: "EF1234".into(),
            customer_name: "<script>".into(),
            contact_number: "0123456789".into(),
            total_price: dec!(50.00),
            payment_method: "Bank Transfer".into(),
            receipt_filename: "receipt_EF1234_20250101_120000_deadbeef.png".into(),
            at: Utc::now(),
        };
        let text = notice.text();
        assert!(text.contains("&lt;script&gt;"));
        assert!(!text.contains("<script>"));
    }

    #[test]
    fn disabled_dispatcher_reports_disabled() {
        assert!(!TelegramDispatcher::disabled().is_enabled());
        let enabled = TelegramDispatcher::new(
            Some("token".into()),
            Some("42".into()),
            Duration::from_secs(5),
        );
        assert!(enabled.is_enabled());
    }
}
