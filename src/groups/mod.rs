/// RFC 3526 MODP group (1536-bit safe prime, generator 2).
pub mod rfc3526;

pub use rfc3526::modp1536;
