//! Best-effort "scroll that wheel to index i" instructions.
//!
//! The resolver never waits for a wheel to move. It pushes a
//! [`ScrollCommand`] onto a lock-free queue shared with the presentation
//! layer, which drains it on its own schedule. When snaps arrive faster than
//! the wheels animate, only the most recent command per wheel matters.

use std::sync::Arc;

use crossbeam_queue::SegQueue;

use crate::DateField;

/// Move `field`'s wheel so that `index` is the settled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollCommand {
    pub field: DateField,
    pub index: usize,
}

/// Implemented by whatever owns the wheel widgets.
pub trait WheelScroller {
    fn scroll_to_index(&mut self, field: DateField, index: usize);
}

impl<F> WheelScroller for F
where
    F: FnMut(DateField, usize),
{
    fn scroll_to_index(&mut self, field: DateField, index: usize) {
        self(field, index);
    }
}

/// Lock-free queue shared between the resolver and the wheel presentation.
#[derive(Clone, Debug, Default)]
pub struct ScrollQueue {
    queue: Arc<SegQueue<ScrollCommand>>,
}

impl ScrollQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: ScrollCommand) {
        tracing::trace!(field = %command.field, index = command.index, "queued wheel scroll");
        self.queue.push(command);
    }

    pub fn submit(&self, field: DateField, index: usize) {
        self.push(ScrollCommand { field, index });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Every pending command, oldest first.
    #[must_use]
    pub fn drain_all(&self) -> Vec<ScrollCommand> {
        let mut drained = Vec::new();
        while let Some(command) = self.queue.pop() {
            drained.push(command);
        }
        drained
    }

    /// Pending commands reduced to the last one per wheel.
    ///
    /// Note: the result is ordered by each wheel's final submission.
    #[must_use]
    pub fn drain_latest(&self) -> Vec<ScrollCommand> {
        let drained = self.drain_all();
        let total = drained.len();
        let mut latest: Vec<ScrollCommand> = Vec::with_capacity(total.min(3));
        for command in drained.into_iter().rev() {
            if !latest.iter().any(|kept| kept.field == command.field) {
                latest.push(command);
            }
        }
        latest.reverse();
        if latest.len() < total {
            tracing::trace!(superseded = total - latest.len(), "coalesced wheel scrolls");
        }
        latest
    }

    /// Drains the queue into `scroller`, returning how many commands were delivered.
    pub fn dispatch<S: WheelScroller + ?Sized>(&self, scroller: &mut S) -> usize {
        let commands = self.drain_latest();
        for command in &commands {
            scroller.scroll_to_index(command.field, command.index);
        }
        commands.len()
    }

    /// Drops every pending command, returning how many were abandoned.
    pub fn cancel_all(&self) -> usize {
        let mut abandoned = 0;
        while self.queue.pop().is_some() {
            abandoned += 1;
        }
        if abandoned > 0 {
            tracing::debug!(abandoned, "cancelled pending wheel scrolls");
        }
        abandoned
    }
}
