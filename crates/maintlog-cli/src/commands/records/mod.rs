//! Record command handlers.
//!
//! Every handler opens the record store, refreshes it with `load` where it
//! reads, and awaits `settle` before returning so remote mirrors finish.

mod add;
mod delete;
mod edit;
mod export;
mod form;
mod list;
mod report;
mod search;
mod show;

pub use add::handle_add;
pub use delete::handle_delete;
pub use edit::handle_edit;
pub use export::handle_export;
pub use list::handle_list;
pub use report::handle_report;
pub use search::handle_search;
pub use show::handle_show;
