use crate::domain::errors::ValidationError;

/// Regions a volume can be managed in, as (code, display name)
const REGIONS: &[(&str, &str)] = &[
    ("us-east-1", "US East (N. Virginia)"),
    ("us-west-2", "US West (Oregon)"),
    ("us-west-1", "US West (N. California)"),
    ("eu-west-1", "EU (Ireland)"),
    ("eu-central-1", "EU (Frankfurt)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("sa-east-1", "South America (Sao Paulo)"),
];

/// Legacy short region names, still accepted on the command line
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("us-e1", "us-east-1"),
    ("us-w1", "us-west-1"),
    ("eu-w1", "eu-west-1"),
    ("apac-se1", "ap-southeast-1"),
];

/// A region from the supported set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    code: &'static str,
    name: &'static str,
}

impl Region {
    pub const DEFAULT_CODE: &'static str = "us-east-1";

    /// Parse a region code or legacy alias
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        let code = LEGACY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == value)
            .map_or(value, |(_, code)| *code);

        REGIONS
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(code, name)| Region { code, name })
            .ok_or_else(|| ValidationError::UnknownRegion(value.to_string()))
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human readable name, e.g. "EU (Ireland)"
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// All supported regions
    pub fn all() -> impl Iterator<Item = Region> {
        REGIONS.iter().map(|&(code, name)| Region { code, name })
    }
}

impl Default for Region {
    fn default() -> Self {
        let (code, name) = REGIONS[0];
        Region { code, name }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl std::str::FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Region {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
