//! Export targets: the iCalendar file and the plain-text post document.

pub mod ics;
pub mod text;

pub use ics::render_calendar;
pub use text::{post_file_name, render_post_document};
