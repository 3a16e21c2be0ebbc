//! The base module contains the infrastructure shared by the lexical and
//! syntactic layers of the `Tactic` front end.

pub mod source;

mod error;
#[doc(inline)]
pub use error::{Error, Result};

mod diagnostic;
pub use diagnostic::{Handler, PrintHandler, VoidHandler};

pub mod log;
