//! The evaluation pipeline: concurrent reads, soft failure, and verdicts.

mod evaluation;
mod fetcher;
mod pipeline;
mod session;

pub use evaluation::{Evaluation, PageContext};
pub use fetcher::Fetcher;
pub use pipeline::Engine;
pub use session::{Session, Ticket};
