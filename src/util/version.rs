pub const PROGRAM_VERSION_NAME: &str = concat!("tordial/", env!("CARGO_PKG_VERSION"));
