//! Host identity resolution against the manager's roster.

/// Determine which roster entry, if any, refers to this node.
///
/// Ordered policy, first match wins:
///
/// 1. an empty roster resolves nothing;
/// 2. a non-empty `hostname` present verbatim in the roster wins outright;
/// 3. otherwise the first roster entry starting with a non-empty
///    `private_hostname` wins, because the manager may record the
///    domain-qualified form (`ip-10-1-1-1.ec2.internal`) of the bare name
///    the node reports for itself (`ip-10-1-1-1`).
///
/// Empty-string hostnames are treated as absent and never match. Pure and
/// deterministic; no scoring among multiple prefix candidates.
pub fn resolve_host_identity(
    hostname: &str,
    private_hostname: &str,
    roster: &[String],
) -> Option<String> {
    if roster.is_empty() {
        return None;
    }
    if !hostname.is_empty() && roster.iter().any(|h| h == hostname) {
        return Some(hostname.to_string());
    }
    if !private_hostname.is_empty() {
        return roster
            .iter()
            .find(|h| h.starts_with(private_hostname))
            .cloned();
    }
    None
}
