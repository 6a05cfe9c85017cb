pub mod job;

pub use job::{JobDetail, JobSummary, Source};
