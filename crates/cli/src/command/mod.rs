pub mod eval;
pub mod inspect;
pub mod list;
pub mod query;
pub mod repl;
pub mod sample;
