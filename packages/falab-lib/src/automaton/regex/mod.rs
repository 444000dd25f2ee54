pub mod ast;
pub mod eliminate;
pub mod parser;
pub mod thompson;

pub use ast::Ast;
pub use thompson::regex_to_nfa;
