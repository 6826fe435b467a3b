//! Fact extraction over converted page text.
//!
//! Every extractor in this module is pure text-in/structured-out and
//! represents a missing signal as absence, never as an error:
//! - contact details (`contact`)
//! - long-form dates (`dates`)
//! - shared header/footer fragments (`layout`)
//! - blog post segmentation (`posts`)

pub mod contact;
pub mod dates;
pub mod layout;
pub mod posts;

pub use contact::{extract_contact_facts, normalize_phone};
pub use dates::extract_date;
pub use layout::{CommonSections, detect_common_sections};
pub use posts::extract_posts;
