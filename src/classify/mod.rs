//! Filename-based classification of deliverable files.

mod group;
mod kind;
mod rules;

pub use group::extract_group_id;
pub use kind::{FileClassification, FileKind};
pub use rules::{classify, deciding_rule, FilenameFacts, Rule, RULES};
