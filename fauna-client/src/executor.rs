use tokio::runtime::Handle;

/// A unit of work handed to an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs callbacks registered with
/// [`QueryResult::on_complete`](crate::QueryResult::on_complete).
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

/// Runs every task immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Executor for Inline {
    fn execute(&self, task: Task) {
        task()
    }
}

/// Tasks are run on the blocking thread pool of the runtime, so they are
/// free to call [`QueryResult::wait`](crate::QueryResult::wait).
impl Executor for Handle {
    fn execute(&self, task: Task) {
        self.spawn_blocking(task);
    }
}
