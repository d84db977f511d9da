//! CLI command implementations.

pub(crate) mod embed;
pub(crate) mod inspect;
pub(crate) mod launch;
pub(crate) mod metadata;
pub(crate) mod thumbnail;

pub(crate) use embed::EmbedArgs;
pub(crate) use inspect::InspectArgs;
pub(crate) use launch::LaunchArgs;
pub(crate) use metadata::MetadataArgs;
pub(crate) use thumbnail::ThumbnailArgs;
