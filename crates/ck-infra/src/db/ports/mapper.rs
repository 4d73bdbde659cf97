use anyhow::Result;

/// Domain value -> row(s) to insert. A clip maps to one `clips` row plus
/// one `clip_formats` row per format.
pub trait InsertMapper<D, R>: Sync + Send {
    fn to_row(&self, domain: &D) -> Result<R>;
}

/// Loaded row(s) -> domain value. Fails on stored data the domain cannot
/// represent (unknown policy JSON, malformed fingerprint).
pub trait RowMapper<R, D>: Sync + Send {
    fn to_domain(&self, row: &R) -> Result<D>;
}
