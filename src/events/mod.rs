//! Event channel decoupling order-ledger mutations from notification I/O.
//!
//! Services emit events after a transaction commits; a background task drains
//! the channel and forwards each rendered notice to the Telegram dispatcher.
//! A full or closed channel never fails the originating request.

use crate::notifications::{
    OrderActionNotice, OrderItemsEditedNotice, OrderShippedNotice, OrderUpdatedNotice,
    PaymentLinkNotice, PaymentRejectedNotice, PaymentSubmittedNotice, PaymentVerifiedNotice,
    ReservationNotice, TelegramDispatcher,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub enum Event {
    OrderReserved(ReservationNotice),
    PaymentSubmitted(PaymentSubmittedNotice),
    PaymentVerified(PaymentVerifiedNotice),
    PaymentRejected(PaymentRejectedNotice),
    PaymentLinkGenerated(PaymentLinkNotice),
    OrderShipped(OrderShippedNotice),
    OrderCompleted(OrderActionNotice),
    OrderCancelled(OrderActionNotice),
    OrderDeleted(OrderActionNotice),
    OrderUpdated(OrderUpdatedNotice),
    OrderItemsEdited(OrderItemsEditedNotice),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::OrderReserved(_) => "order_reserved",
            Event::PaymentSubmitted(_) => "payment_submitted",
            Event::PaymentVerified(_) => "payment_verified",
            Event::PaymentRejected(_) => "payment_rejected",
            Event::PaymentLinkGenerated(_) => "payment_link_generated",
            Event::OrderShipped(_) => "order_shipped",
            Event::OrderCompleted(_) => "order_completed",
            Event::OrderCancelled(_) => "order_cancelled",
            Event::OrderDeleted(_) => "order_deleted",
            Event::OrderUpdated(_) => "order_updated",
            Event::OrderItemsEdited(_) => "order_items_edited",
        }
    }

    pub fn render(&self) -> String {
        match self {
            Event::OrderReserved(n) => n.text(),
            Event::PaymentSubmitted(n) => n.text(),
            Event::PaymentVerified(n) => n.text(),
            Event::PaymentRejected(n) => n.text(),
            Event::PaymentLinkGenerated(n) => n.text(),
            Event::OrderShipped(n) => n.text(),
            Event::OrderCompleted(n) | Event::OrderCancelled(n) | Event::OrderDeleted(n) => {
                n.text()
            }
            Event::OrderUpdated(n) => n.text(),
            Event::OrderItemsEdited(n) => n.text(),
        }
    }
}

/// Cloneable handle for emitting events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    /// Fire-and-forget emit. Drops the event with an error log when the
    /// channel is full or the processor has shut down.
    pub fn send_or_log(&self, event: Event) {
        let name = event.name();
        if let Err(err) = self.tx.try_send(event) {
            error!(event = name, error = %err, "Failed to queue event");
        }
    }

    /// A sender paired with a drained receiver, for tests and for running
    /// with notifications disabled.
    pub fn noop() -> Self {
        let (tx, mut rx) = mpsc::channel(64);
        tokio::spawn(async move { while rx.recv().await.is_some() {} });
        Self { tx }
    }
}

/// Drains the event channel, rendering and dispatching each notice.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, dispatcher: TelegramDispatcher) {
    info!(enabled = dispatcher.is_enabled(), "Event processor started");
    while let Some(event) = rx.recv().await {
        debug!(event = event.name(), "Processing event");
        dispatcher.send(&event.render()).await;
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn shipped_notice() -> OrderShippedNotice {
        OrderShippedNotice {
            code: "EF1234".into(),
            customer_name: "Aisha".into(),
            contact_number: "0123456789".into(),
            tracking_number: "MY123456789".into(),
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender.send_or_log(Event::OrderShipped(shipped_notice()));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "order_shipped");
        assert!(event.render().contains("MY123456789"));
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (tx, _rx) = mpsc::channel(1);
        let sender = EventSender::new(tx);

        let notice = OrderActionNotice::completed(
            "EF1234".into(),
            "Aisha".into(),
            "0123456789".into(),
            dec!(57.00),
            "admin".into(),
        );
        sender.send_or_log(Event::OrderCompleted(notice.clone()));
        // Second send hits a full channel and must return without blocking.
        sender.send_or_log(Event::OrderCompleted(notice));
    }
}
