use anyhow::{Result, bail};

/// Check one DNS label: lowercase `[a-z0-9-]`, 1..=63 chars, no hyphen at
/// either end. `what` names the value in error messages.
fn check_label(what: &str, value: &str, label: &str) -> Result<()> {
    if label.is_empty() {
        bail!("{} '{}' has an empty label", what, value);
    }
    if label.len() > 63 {
        bail!("{} '{}' has a label longer than 63 characters", what, value);
    }
    if label.starts_with('-') || label.ends_with('-') {
        bail!("{} '{}' must not start or end a label with a hyphen", what, value);
    }
    if !label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!("{} '{}' must be lowercase [a-z0-9-]", what, value);
    }
    Ok(())
}

/// A cluster ID is a single DNS label. It becomes a snapshot file stem, so
/// dots and path separators are never accepted.
pub fn validate_cluster_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("cluster id must not be empty");
    }
    check_label("cluster id", id, id)
}

/// Validate a node name (DNS subdomain: dot-separated labels, 253 chars max).
pub fn validate_node_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("node name must not be empty");
    }
    if name.len() > 253 {
        bail!("node name exceeds 253 characters (got {})", name.len());
    }
    for label in name.split('.') {
        check_label("node name", name, label)?;
    }
    Ok(())
}
