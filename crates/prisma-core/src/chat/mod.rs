//! Chat service exchanges.
//!
//! [`transport`] defines the port to the remote service; [`dispatcher`]
//! drives one exchange at a time through it.

pub mod dispatcher;
pub mod transport;
