//! Run orchestration: the scheduler, result aggregation, and progress.

mod aggregator;
mod progress;
mod scheduler;

pub use aggregator::ResultAggregator;
pub use progress::Progress;
pub use scheduler::{SchedulerError, TaskScheduler};
