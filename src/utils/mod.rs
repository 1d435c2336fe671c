//! Request helpers shared by middleware.
//!
//! - [`client_ip`] - Client address resolution (peer socket or proxy headers)

pub mod client_ip;

pub use client_ip::ClientIpSource;
