use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use memorito_protocol::GameEvent;

/// Stream of every event emitted after subscribing.
pub type EventStream = UnboundedReceiver<GameEvent>;

/// Fan-out of engine events to any number of subscribers.
#[derive(Debug, Default)]
pub(crate) struct EventHub {
    subscribers: Vec<UnboundedSender<GameEvent>>,
}

impl EventHub {
    pub fn subscribe(&mut self) -> EventStream {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers to every live subscriber, dropping the ones that hung up.
    pub fn emit(&mut self, event: GameEvent) {
        log::trace!("emit {:?}", event);
        self.subscribers.retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{FutureExt, StreamExt};

    #[test]
    fn emit_prunes_closed_subscribers() {
        let mut hub = EventHub::default();
        let mut kept = hub.subscribe();
        drop(hub.subscribe());

        hub.emit(GameEvent::Won { moves: 8 });

        assert_eq!(hub.subscribers.len(), 1);
        assert_eq!(kept.next().now_or_never(), Some(Some(GameEvent::Won { moves: 8 })));
    }
}
