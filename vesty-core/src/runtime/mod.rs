//! Command resolution: parsing input into the builtin table and the
//! resolver capability the console executes against.

pub mod parser;
pub mod resolver;
