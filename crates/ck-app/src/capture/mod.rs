mod coalescer;
mod dedup_gate;
mod reader;
mod worker;

pub use coalescer::{Burst, BurstCoalescer};
pub use dedup_gate::DeduplicationGate;
pub use reader::ClipboardSnapshotReader;
pub use worker::CaptureWorker;
