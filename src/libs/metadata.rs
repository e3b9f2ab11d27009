//! Build-time package metadata, generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

pub fn name() -> &'static str {
    APP_METADATA_NAME
}

pub fn version() -> &'static str {
    APP_METADATA_VERSION
}
