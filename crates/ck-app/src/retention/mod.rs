mod sweeper;

pub use sweeper::{RetentionSweeper, RetentionTrigger, SweepReport};
