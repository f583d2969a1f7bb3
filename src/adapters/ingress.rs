use tokio::sync::mpsc;

use crate::core::types::{DeliveryStatus, DocType, IngestEvent};

/// The message-bus collaborator, collapsed to the one thing the driver
/// consumes: a stream of ingest events. Mirrors the upstream Kafka
/// consumer's `Msg() -> <-chan ConsumerMessage` shape.
pub trait Ingress: Send {
    fn events(self) -> mpsc::Receiver<IngestEvent>;
}

/// Replays a fixed in-memory batch of events then closes the channel,
/// standing in for a real Kafka consumer group in tests and the CLI
/// demo.
pub struct FakeIngress {
    batch: Vec<IngestEvent>,
}

impl FakeIngress {
    pub fn new(batch: Vec<IngestEvent>) -> Self {
        FakeIngress { batch }
    }

    /// Builds a batch of `InDelivery` events for each `doc_id`,
    /// terminated by a single `OutOfStock` end-of-batch sentinel.
    pub fn batch_of(doc_ids: impl IntoIterator<Item = (&'static str, DocType)>) -> Self {
        let mut batch: Vec<IngestEvent> = doc_ids
            .into_iter()
            .map(|(doc_id, doc_type)| IngestEvent {
                doc_type,
                doc_id: doc_id.to_string(),
                delivery_status: DeliveryStatus::InDelivery,
            })
            .collect();
        batch.push(IngestEvent {
            doc_type: DocType::TextDoc,
            doc_id: String::new(),
            delivery_status: DeliveryStatus::OutOfStock,
        });
        FakeIngress { batch }
    }
}

impl Ingress for FakeIngress {
    fn events(self) -> mpsc::Receiver<IngestEvent> {
        let (tx, rx) = mpsc::channel(20);
        tokio::spawn(async move {
            for event in self.batch {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn batch_of_ends_with_out_of_stock_sentinel() {
        let ingress = FakeIngress::batch_of([("1", DocType::TextDoc), ("2", DocType::TextDoc)]);
        let mut rx = ingress.events();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.delivery_status, DeliveryStatus::InDelivery);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.delivery_status, DeliveryStatus::InDelivery);
        let third = rx.recv().await.unwrap();
        assert_eq!(third.delivery_status, DeliveryStatus::OutOfStock);
        assert!(rx.recv().await.is_none());
    }
}
