#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDestination {
    pub site: String,
    pub directory: String,
}

impl SiteDestination {
    /// Returns `None` unless both parts are present and non-blank.
    pub fn from_parts(site: Option<String>, directory: Option<String>) -> Option<Self> {
        let site = site.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())?;
        let directory = directory
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())?;
        Some(Self { site, directory })
    }
}
