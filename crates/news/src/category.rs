use serde::{Deserialize, Serialize};

use newsfeed_core::StrEnum;

/// Editorial section a news item is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nacional,
    Regional,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Nacional => "Nacional",
            Category::Regional => "Regional",
        }
    }
}

impl StrEnum for Category {
    const KIND: &'static str = "category";
    const MEMBERS: &'static [Self] = &[Category::Nacional, Category::Regional];

    fn name(&self) -> &'static str {
        match self {
            Category::Nacional => "NACIONAL",
            Category::Regional => "REGIONAL",
        }
    }

    fn value(&self) -> &'static str {
        match self {
            Category::Nacional => "nacional",
            Category::Regional => "regional",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Category {
    type Err = newsfeed_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_is_case_insensitive() {
        assert_eq!("nacional".parse::<Category>().unwrap(), Category::Nacional);
        assert_eq!(Category::from_name("REGIONAL").unwrap(), Category::Regional);
        assert!(Category::from_name("internacional").is_err());
    }

    #[test]
    fn displays_as_member_name() {
        assert_eq!(Category::Regional.to_string(), "REGIONAL");
        assert_eq!(Category::Regional.value(), "regional");
        assert_eq!(Category::Regional.label(), "Regional");
    }

    #[test]
    fn serde_uses_stored_value() {
        let json = serde_json::to_string(&Category::Nacional).unwrap();
        assert_eq!(json, "\"nacional\"");
    }
}
