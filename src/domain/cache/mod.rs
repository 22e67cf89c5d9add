//! Cache domain - key scheme and cache abstraction

mod key;
mod repository;

pub use key::{glob_to_regex, CacheKey, ResourceKind};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::{MockCache, MockCacheFailure};
