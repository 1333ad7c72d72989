mod headers;

pub use headers::with_security_headers;
