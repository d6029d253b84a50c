// Notification channel - Lock-free SPSC queue from the session manager to the front end

use crate::messaging::notification::Notification;
use ringbuf::{HeapRb, traits::Split};

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}

/// Pop everything currently queued
pub fn drain_notifications(rx: &mut NotificationConsumer) -> Vec<Notification> {
    let mut drained = Vec::new();
    while let Some(notification) = ringbuf::traits::Consumer::try_pop(rx) {
        drained.push(notification);
    }
    drained
}
