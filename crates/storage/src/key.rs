use url::Url;

/// Cache key for a fetched resource: the final segment of the URL path.
///
/// Two URLs that share a path basename share a cache entry, regardless of
/// host or query string. The on-disk cache layout is addressed by this key,
/// so changing the derivation would orphan existing cache directories.
pub fn resource_key(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("")
        .to_string()
}
