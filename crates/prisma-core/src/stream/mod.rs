//! Stream decoding: raw chunks to lines ([`decoder`]) and lines to typed
//! events ([`parser`]).

pub mod decoder;
pub mod parser;
