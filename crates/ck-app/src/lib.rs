//! ClipKeep application layer
//!
//! Use cases for capture, retention and restore, plus the long-running
//! runtimes (capture worker, retention sweeper) that drive them.

pub mod capture;
pub mod locks;
pub mod retention;
pub mod usecases;

pub use capture::{BurstCoalescer, CaptureWorker, ClipboardSnapshotReader, DeduplicationGate};
pub use locks::CollectionLocks;
pub use retention::{RetentionSweeper, RetentionTrigger, SweepReport};
pub use usecases::{
    CaptureClipUseCase, EnforceRetentionUseCase, PurgeError, PurgeReport, PurgeTrashUseCase,
    RegisterPendingEchoUseCase, RestoreClipUseCase, RetentionReport, RetentionScope,
};
