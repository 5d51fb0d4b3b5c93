use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use fetchproc::exec::FetchBackend;
use fetchproc::types::{CommandSpec, Outcome};

/// A fake backend that:
/// - records the argv of every command it was asked to run
/// - replies with queued outcomes in order (`None` once the queue is empty).
#[derive(Debug, Clone, Default)]
pub struct FakeFetchBackend {
    replies: Arc<Mutex<VecDeque<Option<Outcome>>>>,
    executed: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeFetchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, outcome: Option<Outcome>) -> Self {
        self.replies.lock().unwrap().push_back(outcome);
        self
    }

    pub fn executed(&self) -> Vec<Vec<String>> {
        self.executed.lock().unwrap().clone()
    }
}

impl FetchBackend for FakeFetchBackend {
    fn fetch(
        &mut self,
        spec: CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Option<Outcome>> + Send + '_>> {
        let replies = Arc::clone(&self.replies);
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(spec.argv().to_vec());
            replies.lock().unwrap().pop_front().flatten()
        })
    }
}
