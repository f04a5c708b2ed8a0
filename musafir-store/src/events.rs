use async_trait::async_trait;
use chrono::Utc;
use musafir_booking::models::Booking;
use musafir_booking::notify::NotificationDispatcher;
use musafir_core::NotifyError;
use musafir_shared::events::{BookingCancelledEvent, BookingCreatedEvent};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{error, info};

const TOPIC_CREATED: &str = "bookings.created";
const TOPIC_CANCELLED: &str = "bookings.cancelled";

/// Kafka-backed notification producer. The downstream delivery service
/// (email/SMS) consumes these topics; from the booking core's view the
/// publish is best-effort.
#[derive(Clone)]
pub struct KafkaNotifier {
    producer: FutureProducer,
}

impl KafkaNotifier {
    pub fn new(brokers: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), NotifyError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self
            .producer
            .send(record, Timeout::After(Duration::from_secs(0)))
            .await
        {
            Ok(delivery) => {
                info!(
                    "Sent message to {}/{}: partition {} offset {}",
                    topic, key, delivery.partition, delivery.offset
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", topic, e);
                Err(NotifyError(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl NotificationDispatcher for KafkaNotifier {
    async fn booking_created(
        &self,
        user_email: &str,
        booking: &Booking,
    ) -> Result<(), NotifyError> {
        let event = BookingCreatedEvent {
            booking_id: booking.id,
            user_email: user_email.to_string(),
            item_type: booking.item_type.to_string(),
            item_id: booking.item_id,
            total: booking.amount.total,
            currency: booking.amount.currency.clone(),
            timestamp: Utc::now().timestamp(),
        };
        let payload = serde_json::to_string(&event).map_err(|e| NotifyError(e.to_string()))?;
        self.publish(TOPIC_CREATED, &booking.id.to_string(), &payload)
            .await
    }

    async fn booking_cancelled(
        &self,
        user_email: &str,
        booking: &Booking,
    ) -> Result<(), NotifyError> {
        let cancellation = booking.cancellation.as_ref();
        let event = BookingCancelledEvent {
            booking_id: booking.id,
            user_email: user_email.to_string(),
            refund_amount: cancellation.map(|c| c.refund_amount).unwrap_or(0.0),
            reason: cancellation.and_then(|c| c.reason.clone()),
            timestamp: Utc::now().timestamp(),
        };
        let payload = serde_json::to_string(&event).map_err(|e| NotifyError(e.to_string()))?;
        self.publish(TOPIC_CANCELLED, &booking.id.to_string(), &payload)
            .await
    }
}
