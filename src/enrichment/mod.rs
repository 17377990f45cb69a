mod correlation;
mod feed;
mod keys;
mod resolver;
mod snapshot;
mod source;

#[cfg(test)]
pub(crate) mod fixtures;

pub use feed::EnrichmentFeed;
pub use keys::extract;
pub use resolver::EnrichmentResolver;
pub use snapshot::EnrichmentSnapshot;
pub use source::EnrichmentSource;
