pub mod io;
pub mod measurement;
pub mod predicates;
pub mod primitives;
pub mod processing;
pub mod query;
pub mod simplify;
pub mod transform;
pub mod validation;
