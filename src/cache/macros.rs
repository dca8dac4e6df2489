/// Get-or-fetch against the TTL cache.
///
/// Checks the cache first and returns the hit if one is live. On a miss it
/// takes the per-key fetch lock, re-checks the cache (another task may have
/// filled the key while we waited), then runs the block, stores the result
/// and returns it. A cache hit never reaches the block, so a key sees at
/// most one upstream call per TTL window even under concurrent fan-out.
///
/// # Arguments
/// * `$cache`: the cache instance; must have `get`, `insert` and `key_lock`.
/// * `$key`: the `CacheKey` to look up and fill.
/// * `$ttl`: time-to-live for the stored value, as a `Duration`.
/// * `$block`: async block producing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let movies: Vec<TmdbMovie> = cached!(self.cache, CacheKey::Trending, ttl, async {
///     fetch_trending().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get(&$key).await {
            Ok(cached)
        } else {
            let _guard = $cache.key_lock(&$key).await;
            if let Some(cached) = $cache.get(&$key).await {
                Ok(cached)
            } else {
                let value = $block.await?;
                $cache.insert(&$key, &value, $ttl).await;
                Ok(value)
            }
        }
    }};
}
