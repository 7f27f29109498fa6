//! Flat-file credential store with a reversible character-shift obfuscation.
//!
//! The shift scheme is not a security control. It exists so stores written
//! by earlier versions of the tool can be read, extended and written back unchanged.

pub mod core {
    pub mod config;
    pub mod error;
    pub mod tracing_init;
}

pub mod codec {
    pub mod shift;
}

pub mod models {
    pub mod user;
}

pub mod signup {
    pub mod workflow;
}

pub mod stores {
    pub mod record_store;
}
