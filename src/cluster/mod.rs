pub mod coordinator;
pub mod gather;
pub mod process_group;
pub mod thread_group;
pub mod wire;
pub mod worker;

pub use coordinator::{Coordinator, RankSummary, RunSummary};
pub use gather::order_by_rank;
pub use process_group::{run_rank_process, LaunchedGroup, ProcessGroup};
pub use thread_group::ThreadGroup;
pub use wire::Contribution;
pub use worker::Worker;
