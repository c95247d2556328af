use std::collections::VecDeque;

/// Handle for one outstanding cook request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CookTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CookOutcome {
    /// Result became the active mesh; it and every older request were retired.
    Installed,
    /// Cook failed; the request was dropped and the previous mesh kept.
    Failed,
    /// Ticket was no longer in flight (superseded or never issued).
    Ignored,
}

/// Tracks asynchronous collision cooks so that only the newest successful result is kept.
///
/// Any number of requests may be in flight. A successful finish installs its mesh and
/// retires itself and all older requests, so late arrivals from those are ignored. A failed
/// finish only removes that request.
#[derive(Debug)]
pub struct CookQueue<T> {
    next: u64,
    pending: VecDeque<(CookTicket, T)>,
    active: Option<T>,
    active_ticket: Option<CookTicket>,
}

impl<T> Default for CookQueue<T> {
    fn default() -> Self {
        Self {
            next: 0,
            pending: VecDeque::new(),
            active: None,
            active_ticket: None,
        }
    }
}

impl<T> CookQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty queue whose first ticket is `first`. Lets an owner that replaces its queues keep
    /// ticket numbers increasing, so results for requests made before the swap stay unknown.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: first,
            ..Self::default()
        }
    }

    /// Number the next [`CookQueue::submit`] will use.
    pub fn next_ticket(&self) -> u64 {
        self.next
    }

    /// Queues `mesh` for cooking and returns the ticket the cooker reports back with.
    pub fn submit(&mut self, mesh: T) -> CookTicket {
        let ticket = CookTicket(self.next);
        self.next += 1;
        self.pending.push_back((ticket, mesh));
        ticket
    }

    pub fn finish(&mut self, ticket: CookTicket, success: bool) -> CookOutcome {
        let Some(pos) = self.pending.iter().position(|(t, _)| *t == ticket) else {
            log::debug!(target: "cook", "ignoring stale cook result {:?}", ticket);
            return CookOutcome::Ignored;
        };
        if !success {
            self.pending.remove(pos);
            log::warn!(target: "cook", "collision cook {:?} failed; keeping previous mesh", ticket);
            return CookOutcome::Failed;
        }
        let installed = self.pending.drain(..=pos).last();
        if let Some((_, mesh)) = installed {
            self.active = Some(mesh);
            self.active_ticket = Some(ticket);
        }
        CookOutcome::Installed
    }

    /// Installs a synchronously cooked mesh and forgets every request in flight.
    pub fn cook_now(&mut self, mesh: T) {
        self.pending.clear();
        self.active = Some(mesh);
        self.active_ticket = None;
    }

    pub fn active(&self) -> Option<&T> {
        self.active.as_ref()
    }

    /// Ticket of the request that produced the active mesh, if it came from the queue.
    pub fn active_ticket(&self) -> Option<CookTicket> {
        self.active_ticket
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, ticket: CookTicket) -> bool {
        self.pending.iter().any(|(t, _)| *t == ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_success_wins_and_retires_older() {
        let mut q = CookQueue::new();
        let a = q.submit("a");
        let b = q.submit("b");
        let c = q.submit("c");
        assert_eq!(q.finish(b, true), CookOutcome::Installed);
        assert_eq!(q.active(), Some(&"b"));
        assert!(!q.is_pending(a));
        assert!(q.is_pending(c));
        // Older request landing late is discarded.
        assert_eq!(q.finish(a, true), CookOutcome::Ignored);
        assert_eq!(q.active(), Some(&"b"));
        assert_eq!(q.finish(c, true), CookOutcome::Installed);
        assert_eq!(q.active(), Some(&"c"));
        assert_eq!(q.in_flight(), 0);
    }

    #[test]
    fn failure_keeps_previous_mesh() {
        let mut q = CookQueue::new();
        let a = q.submit(1);
        q.finish(a, true);
        let b = q.submit(2);
        let c = q.submit(3);
        assert_eq!(q.finish(b, false), CookOutcome::Failed);
        assert_eq!(q.active(), Some(&1));
        assert_eq!(q.active_ticket(), Some(a));
        assert!(q.is_pending(c));
        assert_eq!(q.in_flight(), 1);
    }

    #[test]
    fn failure_does_not_retire_older_requests() {
        let mut q = CookQueue::new();
        let a = q.submit(7u8);
        let b = q.submit(8u8);
        q.finish(b, false);
        assert!(q.is_pending(a));
        assert_eq!(q.finish(a, true), CookOutcome::Installed);
        assert_eq!(q.active(), Some(&7));
    }

    #[test]
    fn cook_now_clears_queue() {
        let mut q = CookQueue::new();
        let a = q.submit(1);
        q.submit(2);
        q.cook_now(5);
        assert_eq!(q.in_flight(), 0);
        assert_eq!(q.active(), Some(&5));
        assert_eq!(q.finish(a, true), CookOutcome::Ignored);
        assert_eq!(q.active_ticket(), None);
    }

    #[test]
    fn starting_at_skips_earlier_tickets() {
        let mut old = CookQueue::new();
        let stale = old.submit(1);
        let mut q = CookQueue::starting_at(old.next_ticket());
        let fresh = q.submit(2);
        assert_ne!(stale, fresh);
        assert_eq!(q.finish(stale, true), CookOutcome::Ignored);
        assert!(q.is_pending(fresh));
        assert_eq!(q.finish(fresh, true), CookOutcome::Installed);
        assert_eq!(q.active(), Some(&2));
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let mut q = CookQueue::<()>::new();
        assert_eq!(q.finish(CookTicket(42), true), CookOutcome::Ignored);
        assert!(q.active().is_none());
    }
}
