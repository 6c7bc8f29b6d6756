//! Change notification for library observers.

use uuid::Uuid;

use crate::entity::SortOrder;
use crate::error::Result;

/// Handle returned by [`PromptLibrary::subscribe`](super::PromptLibrary::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    PromptAdded(Uuid),
    PromptUpdated(Uuid),
    PromptDeleted(Uuid),
    CategoryAdded(String),
    CategoryDeleted {
        category: String,
        removed_prompts: usize,
    },
    UsageIncremented(Uuid),
    UsageReset,
    SearchTextChanged(String),
    SelectedCategoryChanged(Option<String>),
    SortOrderChanged(SortOrder),
}

/// Outcome of writing the change through to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// Query state only; nothing is written.
    NotRequired,
    Saved,
    Failed(String),
}

impl Persistence {
    pub(crate) fn from_result(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Persistence::Saved,
            Err(e) => Persistence::Failed(e.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Persistence::Failed(_))
    }
}

/// Delivered to every subscriber after a mutation, once persistence has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEvent {
    pub change: Change,
    pub persistence: Persistence,
}

type Callback = Box<dyn FnMut(&LibraryEvent)>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn emit(&mut self, event: &LibraryEvent) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribers_receive_events_until_removed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::default();

        let sink = Rc::clone(&seen);
        let id = subscribers.add(Box::new(move |event: &LibraryEvent| {
            sink.borrow_mut().push(event.clone())
        }));

        let event = LibraryEvent {
            change: Change::UsageReset,
            persistence: Persistence::Saved,
        };
        subscribers.emit(&event);
        assert!(subscribers.remove(id));
        assert!(!subscribers.remove(id));
        subscribers.emit(&event);

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(subscribers.len(), 0);
    }

    #[test]
    fn test_persistence_from_result() {
        assert_eq!(Persistence::from_result(&Ok(())), Persistence::Saved);

        let failed = Persistence::from_result(&Err(crate::PromptBuddyError::Storage(
            "disk full".to_string(),
        )));
        assert!(failed.is_failed());
    }
}
