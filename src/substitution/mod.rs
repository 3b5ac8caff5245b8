//! Taxon substitution and deletion in Newick source trees.
//!
//! Taxa are located as leaf label tokens (see
//! [tokenizer](crate::newick::tokenizer)), so a taxon never matches part of
//! a longer label, and every edited tree is cleaned up afterwards
//! (see [cleanup](crate::cleanup)).
//!
//! * [`substitute`] - replace or delete one taxon in one tree
//! * [`delete_taxa`] - remove several exact labels at once
//! * [`substitute_all`] - apply a [`SubstitutionRequest`] to many trees

mod batch;
mod engine;
mod request;

pub use self::batch::{TreeOutcome, substitute_all};
pub use self::engine::{SubstitutionOutcome, delete_taxa, substitute};
pub use self::request::{Substitution, SubstitutionRequest};
