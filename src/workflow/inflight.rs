use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Tickets with a registration submission currently in progress in this process.
/// Lets one submission per ticket run at a time; the store's unique constraint
/// covers other processes.
#[derive(Clone, Default)]
pub struct InFlightTickets {
    tickets: Arc<Mutex<HashSet<String>>>,
}

impl InFlightTickets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `ticket_id`. Returns `None` if another submission holds it.
    /// The claim is released when the guard drops.
    pub fn acquire(&self, ticket_id: &str) -> Option<InFlightGuard> {
        let mut set = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(ticket_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            tickets: Arc::clone(&self.tickets),
            ticket_id: ticket_id.to_string(),
        })
    }

    pub fn is_in_flight(&self, ticket_id: &str) -> bool {
        let set = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        set.contains(ticket_id)
    }
}

pub struct InFlightGuard {
    tickets: Arc<Mutex<HashSet<String>>>,
    ticket_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut set = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.ticket_id);
    }
}
