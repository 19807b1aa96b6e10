//! Deferred work tagged with the open session that requested it.
//!
//! Nothing here runs on its own: the host drains [`Deferral::NextFrame`] tasks once per frame
//! and [`Deferral::Macrotask`] tasks after the current event has been handled. The owner
//! checks the session tag before acting, so tasks from an earlier open are dropped.

/// Identity of one open/close cycle. Never reused within a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferral {
    /// After the next frame has been laid out.
    NextFrame,
    /// After the current input event, before the next one.
    Macrotask,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    MeasurePlacement,
    FocusSearch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub session: SessionId,
    pub deferral: Deferral,
    pub task: DeferredTask,
}

#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
    pending: Vec<Scheduled>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task; an identical pending task is not queued twice.
    pub fn schedule(&mut self, session: SessionId, deferral: Deferral, task: DeferredTask) {
        let entry = Scheduled {
            session,
            deferral,
            task,
        };
        if !self.pending.contains(&entry) {
            self.pending.push(entry);
        }
    }

    /// Removes and returns every task of `deferral`, in scheduling order.
    pub fn take_due(&mut self, deferral: Deferral) -> Vec<Scheduled> {
        let (due, rest): (Vec<Scheduled>, Vec<Scheduled>) = self
            .pending
            .drain(..)
            .partition(|s| s.deferral == deferral);
        self.pending = rest;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, task: DeferredTask) -> bool {
        self.pending.iter().any(|s| s.task == task)
    }

    /// Drops every task queued by `session`, whatever its deferral.
    pub fn cancel_session(&mut self, session: SessionId) {
        self.pending.retain(|s| s.session != session);
    }
}
