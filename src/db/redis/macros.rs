/// Read-through caching for async provider calls.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for caching with `$ttl` seconds and returns it.
/// Must be used inside a function returning `AppResult`.
///
/// ```rust,ignore
/// cached!(self.cache, CacheKey::MetadataMovie(id), 3600, async move {
///     self.fetch_uncached(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
