//! Client state: results, pagination, form input and notices.

pub mod form;
pub mod results;
pub mod summary;

pub use form::{FormState, SentenceCount};
pub use results::{PageControls, Pagination, ResultBuffer, WindowPolicy};
pub use summary::{Notice, SummaryState};
