//! HTTP clients for lila instances: the source broadcast is read from one
//! (usually lichess.org) and written to another.

pub mod form;
mod local;
mod source;
#[cfg(test)]
mod test_server;

pub use local::LocalClient;
pub use source::SourceClient;
