//! Shared airline selection and its change notifications.
//!
//! The [`SelectionCoordinator`] owns the one authoritative [`Selection`].
//! Charts subscribe listeners and receive every accepted change
//! synchronously, in subscription order. A listener that writes the
//! selection while a notification pass is running has its write queued and
//! applied once the pass completes.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::error::SelectionError;

/// Label used for the "no airline selected" option.
pub const ALL_LABEL: &str = "All";

/// The highlighted airline, or none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    #[default]
    All,
    Airline(String),
}

impl Selection {
    /// Parse a dropdown value: [`ALL_LABEL`] maps to [`Selection::All`].
    pub fn from_option(value: &str) -> Self {
        if value == ALL_LABEL {
            Selection::All
        } else {
            Selection::Airline(value.to_string())
        }
    }

    pub fn airline(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Airline(a) => Some(a),
        }
    }

    /// Whether a review of `airline` belongs to this selection.
    pub fn matches(&self, airline: &str) -> bool {
        self.airline().map_or(true, |a| a == airline)
    }

    pub fn is_selected(&self, airline: &str) -> bool {
        self.airline() == Some(airline)
    }

    /// Selection after the user picks `airline`: picking the current
    /// airline clears it, any other airline replaces it.
    pub fn toggled(&self, airline: &str) -> Selection {
        if self.is_selected(airline) {
            Selection::All
        } else {
            Selection::Airline(airline.to_string())
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Airline(a) => f.write_str(a),
        }
    }
}

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Listener = Box<dyn FnMut(&Selection)>;

/// Owner of the shared [`Selection`].
///
/// All methods take `&self`; the coordinator is shared as
/// `Rc<SelectionCoordinator>` between the dashboard and its charts.
pub struct SelectionCoordinator {
    current: RefCell<Selection>,
    airlines: BTreeSet<String>,
    listeners: RefCell<Vec<(SubscriptionHandle, Listener)>>,
    /// Handles whose listeners are detached for the running pass.
    detached: RefCell<HashSet<SubscriptionHandle>>,
    /// Detached handles unsubscribed during the running pass.
    removed: RefCell<HashSet<SubscriptionHandle>>,
    pending: RefCell<VecDeque<Selection>>,
    notifying: Cell<bool>,
    next_id: Cell<u64>,
}

impl SelectionCoordinator {
    /// Coordinator accepting any of `airlines`, starting at [`Selection::All`].
    pub fn new<I, S>(airlines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectionCoordinator {
            current: RefCell::new(Selection::All),
            airlines: airlines.into_iter().map(Into::into).collect(),
            listeners: RefCell::new(Vec::new()),
            detached: RefCell::new(HashSet::new()),
            removed: RefCell::new(HashSet::new()),
            pending: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
            next_id: Cell::new(0),
        }
    }

    pub fn shared<I, S>(airlines: I) -> Rc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rc::new(Self::new(airlines))
    }

    /// Register `listener`. It is called with every accepted change, after
    /// all listeners subscribed before it.
    pub fn subscribe(&self, listener: impl FnMut(&Selection) + 'static) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.listeners.borrow_mut().push((handle, Box::new(listener)));
        handle
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(h, _)| *h != handle);
        if listeners.len() != before {
            return true;
        }
        drop(listeners);
        // The listener may be detached for the running pass.
        self.detached.borrow().contains(&handle) && self.removed.borrow_mut().insert(handle)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn get_selection(&self) -> Selection {
        self.current.borrow().clone()
    }

    /// Whether `airline` may be selected.
    pub fn knows(&self, airline: &str) -> bool {
        self.airlines.contains(airline)
    }

    /// Set the shared selection.
    ///
    /// Unknown airlines are rejected and nothing changes. Setting the current
    /// value is a no-op. Otherwise the value is stored and every listener is
    /// notified before this returns. Calls made by a listener during that
    /// notification are queued and applied, in order, once it finishes.
    pub fn set_selection(&self, value: Selection) -> Result<(), SelectionError> {
        if let Selection::Airline(airline) = &value {
            if !self.knows(airline) {
                log::warn!("Rejected selection of unknown airline {airline:?}");
                return Err(SelectionError::InvalidSelectionValue(airline.clone()));
            }
        }

        if self.notifying.get() {
            log::debug!("Queued re-entrant selection {value}");
            self.pending.borrow_mut().push_back(value);
            return Ok(());
        }

        let mut next = Some(value);
        while let Some(value) = next {
            self.apply(value);
            next = self.pending.borrow_mut().pop_front();
        }
        Ok(())
    }

    fn apply(&self, value: Selection) {
        if *self.current.borrow() == value {
            return;
        }
        log::debug!("Selection changed: {} -> {value}", self.current.borrow());
        *self.current.borrow_mut() = value.clone();

        self.notifying.set(true);
        let mut detached = std::mem::take(&mut *self.listeners.borrow_mut());
        *self.detached.borrow_mut() = detached.iter().map(|(h, _)| *h).collect();
        for (handle, listener) in detached.iter_mut() {
            if self.removed.borrow().contains(handle) {
                continue;
            }
            listener(&value);
        }
        self.notifying.set(false);

        // Listeners subscribed during the pass were pushed onto the now
        // empty list; they go after the existing ones.
        let mut listeners = self.listeners.borrow_mut();
        let added = std::mem::take(&mut *listeners);
        let mut removed = self.removed.borrow_mut();
        detached.retain(|(h, _)| !removed.contains(h));
        removed.clear();
        self.detached.borrow_mut().clear();
        *listeners = detached;
        listeners.extend(added);
    }
}

impl fmt::Debug for SelectionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionCoordinator")
            .field("current", &*self.current.borrow())
            .field("airlines", &self.airlines.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
