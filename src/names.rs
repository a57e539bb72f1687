//! Splitting of event-name lists such as `"created, updated"`.
//!
//! Registration trims each name; an empty list registers nothing, but an
//! empty segment such as the middle of `"a,,b"` is the name `""`. Dispatch and
//! unregistration take names verbatim unless the registry was configured
//! with `trim_dispatch_names`, so `emit(" a ")` does not reach a listener
//! registered with `on("a")` by default.

/// Names a registration call applies to, each trimmed.
pub(crate) fn registration_names(names: &str, separator: char) -> Vec<String> {
    if names.is_empty() {
        return Vec::new();
    }
    names
        .split(separator)
        .map(|name| name.trim().to_string())
        .collect()
}

/// Names an `emit` or `off` call applies to. Empty segments are kept.
pub(crate) fn dispatch_names(names: &str, separator: char, trim: bool) -> Vec<&str> {
    names
        .split(separator)
        .map(|name| if trim { name.trim() } else { name })
        .collect()
}
