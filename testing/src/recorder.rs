//! Capture everything published on a channel.

use std::cell::RefCell;
use std::rc::Rc;
use todomvc_core::{EventChannel, Message, SubscriptionId};

/// Records every message delivered on an [`EventChannel`].
///
/// The recorder subscribes on [`MessageRecorder::attach`] and unsubscribes
/// when dropped.
pub struct MessageRecorder<E: Message> {
    channel: EventChannel<E>,
    subscription: SubscriptionId,
    log: Rc<RefCell<Vec<E>>>,
}

impl<E: Message> MessageRecorder<E> {
    /// Start recording `channel`
    #[must_use]
    pub fn attach(channel: &EventChannel<E>) -> Self {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let subscription = channel.subscribe(move |message: &E| {
            sink.borrow_mut().push(message.clone());
        });
        Self {
            channel: channel.clone(),
            subscription,
            log,
        }
    }

    /// All recorded messages, oldest first
    #[must_use]
    pub fn messages(&self) -> Vec<E> {
        self.log.borrow().clone()
    }

    /// Names of all recorded messages, oldest first
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.log.borrow().iter().map(Message::name).collect()
    }

    /// Number of recorded messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl<E: Message> Drop for MessageRecorder<E> {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tick(u8);

    impl Message for Tick {
        fn name(&self) -> &'static str {
            "tick"
        }
    }

    #[test]
    fn records_in_order_and_detaches_on_drop() {
        let channel = EventChannel::<Tick>::new("ticks");
        {
            let recorder = MessageRecorder::attach(&channel);
            channel.publish(Tick(1));
            channel.publish(Tick(2));

            assert_eq!(recorder.messages(), vec![Tick(1), Tick(2)]);
            assert_eq!(recorder.names(), vec!["tick", "tick"]);

            recorder.clear();
            assert!(recorder.is_empty());
        }
        assert_eq!(channel.subscriber_count(), 0);
    }
}
