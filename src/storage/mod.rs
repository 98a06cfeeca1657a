pub mod xlsx;

pub use xlsx::{FeedbackRecord, StorageError, XlsxStorage};
