use anyhow::Result;

/// Resolve a candidate value against a persistence lookup, appending a
/// numeric suffix until the value is free.
///
/// An empty candidate, or one the lookup reports as free, is returned
/// unchanged. Otherwise `candidate-1`, `candidate-2`, ... are probed in
/// increasing order and the first free value wins, so a value freed by a
/// committed removal is reused immediately.
///
/// The lookup must reflect committed state only, excluding the entity
/// being saved. A lookup error aborts resolution; callers must not fall
/// back to an unchecked value.
pub fn resolve_unique<F>(candidate: &str, mut exists: F) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    if candidate.is_empty() || !exists(candidate)? {
        return Ok(candidate.to_string());
    }

    let mut suffix: u64 = 1;
    loop {
        let probe = format!("{}-{}", candidate, suffix);
        if !exists(&probe)? {
            return Ok(probe);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashSet;

    fn taken(urls: &[&str]) -> HashSet<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_free_candidate_is_returned_unchanged() {
        let taken = taken(&["/other"]);
        let result = resolve_unique("/backbee", |url| Ok(taken.contains(url))).unwrap();
        assert_eq!(result, "/backbee");
    }

    #[test]
    fn test_empty_candidate_is_returned_unchanged() {
        let result = resolve_unique("", |_| Ok(true)).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_collision_appends_first_suffix() {
        let taken = taken(&["/backbee"]);
        let result = resolve_unique("/backbee", |url| Ok(taken.contains(url))).unwrap();
        assert_eq!(result, "/backbee-1");
    }

    #[test]
    fn test_suffixes_probe_in_increasing_order() {
        let taken = taken(&["/backbee", "/backbee-1", "/backbee-2"]);
        let result = resolve_unique("/backbee", |url| Ok(taken.contains(url))).unwrap();
        assert_eq!(result, "/backbee-3");
    }

    #[test]
    fn test_freed_value_is_reused() {
        // /backbee-1 was removed and committed; the lowest free suffix
        // wins rather than a monotonically increasing counter.
        let taken = taken(&["/backbee", "/backbee-2"]);
        let result = resolve_unique("/backbee", |url| Ok(taken.contains(url))).unwrap();
        assert_eq!(result, "/backbee-1");
    }

    #[test]
    fn test_manual_path_collision() {
        let taken = taken(&["/foo/bar"]);
        let result = resolve_unique("/foo/bar", |url| Ok(taken.contains(url))).unwrap();
        assert_eq!(result, "/foo/bar-1");
    }

    #[test]
    fn test_lookup_error_aborts_resolution() {
        let result = resolve_unique("/backbee", |_| Err(anyhow!("store unreachable")));
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_error_on_probe_aborts_resolution() {
        let result = resolve_unique("/backbee", |url| {
            if url == "/backbee" {
                Ok(true)
            } else {
                Err(anyhow!("store unreachable"))
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_sees_every_probe() {
        let mut probes = Vec::new();
        let taken = taken(&["/a", "/a-1"]);
        let result = resolve_unique("/a", |url| {
            probes.push(url.to_string());
            Ok(taken.contains(url))
        })
        .unwrap();
        assert_eq!(result, "/a-2");
        assert_eq!(probes, vec!["/a", "/a-1", "/a-2"]);
    }
}
