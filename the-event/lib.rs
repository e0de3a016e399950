//! Deferred work drained once per frame.
//!
//! Tasks are queued from any thread and run on the thread that calls
//! [`Dispatcher::process`]. A task carrying a minimum delay that is not yet due
//! is put back at the end of the queue instead of blocking the frame.

use std::{
  fmt,
  time::{
    Duration,
    Instant,
  },
};

use crossbeam::queue::SegQueue;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Deferred {
  task:       Task,
  not_before: Option<Instant>,
}

impl Deferred {
  fn is_due(&self, now: Instant) -> bool {
    self.not_before.is_none_or(|at| at <= now)
  }
}

/// Thread-safe FIFO of deferred tasks.
#[derive(Default)]
pub struct Dispatcher {
  queue: SegQueue<Deferred>,
}

impl fmt::Debug for Dispatcher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Dispatcher")
      .field("pending", &self.queue.len())
      .finish()
  }
}

impl Dispatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn enqueue<F>(&self, task: F)
  where
    F: FnOnce() + Send + 'static,
  {
    self.queue.push(Deferred {
      task:       Box::new(task),
      not_before: None,
    });
  }

  /// Queues `task` to run no earlier than `delay` from now.
  pub fn enqueue_after<F>(&self, task: F, delay: Duration)
  where
    F: FnOnce() + Send + 'static,
  {
    self.queue.push(Deferred {
      task:       Box::new(task),
      not_before: Instant::now().checked_add(delay),
    });
  }

  pub fn len(&self) -> usize {
    self.queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  /// Runs the tasks that are due now. Returns how many ran.
  pub fn process(&self) -> usize {
    self.process_at(Instant::now())
  }

  /// Runs the tasks due at `now`, in the order they were queued.
  ///
  /// Only the tasks queued before the call are looked at. Tasks queued by a
  /// running task, and tasks that are not due yet, wait for the next call.
  pub fn process_at(&self, now: Instant) -> usize {
    let pending = self.queue.len();
    let mut ran = 0;
    let mut deferred = 0;

    for _ in 0..pending {
      let Some(item) = self.queue.pop() else {
        break;
      };
      if item.is_due(now) {
        (item.task)();
        ran += 1;
      } else {
        self.queue.push(item);
        deferred += 1;
      }
    }

    if ran > 0 || deferred > 0 {
      log::trace!("dispatcher ran {ran} tasks, {deferred} not yet due");
    }
    ran
  }
}
