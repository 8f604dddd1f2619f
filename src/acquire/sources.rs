//! Remote element-set groups, in their fixed fetch order.

/// A CelesTrak GP query group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceGroup {
    Cosmos2251Debris,
    Iridium33Debris,
    Fengyun1cDebris,
    Last30Days,
    Stations,
    Visual,
}

impl SourceGroup {
    /// Group label, also used for cache file names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cosmos2251Debris => "cosmos-2251-debris",
            Self::Iridium33Debris => "iridium-33-debris",
            Self::Fengyun1cDebris => "fengyun-1c-debris",
            Self::Last30Days => "last-30-days",
            Self::Stations => "stations",
            Self::Visual => "visual",
        }
    }

    pub fn url(&self) -> String {
        format!(
            "https://celestrak.org/NORAD/elements/gp.php?GROUP={}&FORMAT=tle",
            self.label()
        )
    }
}

/// Debris groups, tried on every acquisition in this order.
pub const PRIMARY_SOURCES: [SourceGroup; 4] = [
    SourceGroup::Cosmos2251Debris,
    SourceGroup::Iridium33Debris,
    SourceGroup::Fengyun1cDebris,
    SourceGroup::Last30Days,
];

/// Well-populated groups, tried only when every primary source failed.
pub const FALLBACK_SOURCES: [SourceGroup; 2] = [SourceGroup::Stations, SourceGroup::Visual];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_gp_query_format() {
        assert_eq!(
            SourceGroup::Cosmos2251Debris.url(),
            "https://celestrak.org/NORAD/elements/gp.php?GROUP=cosmos-2251-debris&FORMAT=tle"
        );
        assert_eq!(
            SourceGroup::Visual.url(),
            "https://celestrak.org/NORAD/elements/gp.php?GROUP=visual&FORMAT=tle"
        );
    }

    #[test]
    fn source_lists_do_not_overlap() {
        for primary in PRIMARY_SOURCES {
            assert!(!FALLBACK_SOURCES.contains(&primary));
        }
    }
}
