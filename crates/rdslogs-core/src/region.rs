//! Regions the tool accepts. The list is fixed; anything else is rejected at parse time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AWS region hosting the database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    #[default]
    UsEast1,
    UsWest1,
    UsWest2,
    ApSouth1,
    ApSoutheast1,
    ApSoutheast2,
    ApNortheast1,
    ApNortheast2,
    EuWest1,
    EuCentral1,
    SaEast1,
}

/// Region codes in the order they are offered on the command line.
pub const REGION_CODES: [&str; 11] = [
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "eu-west-1",
    "eu-central-1",
    "sa-east-1",
];

impl Region {
    pub const ALL: [Region; 11] = [
        Region::UsEast1,
        Region::UsWest1,
        Region::UsWest2,
        Region::ApSouth1,
        Region::ApSoutheast1,
        Region::ApSoutheast2,
        Region::ApNortheast1,
        Region::ApNortheast2,
        Region::EuWest1,
        Region::EuCentral1,
        Region::SaEast1,
    ];

    /// The region code as the service expects it (e.g. `eu-west-1`).
    pub fn code(self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsWest1 => "us-west-1",
            Region::UsWest2 => "us-west-2",
            Region::ApSouth1 => "ap-south-1",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::ApNortheast1 => "ap-northeast-1",
            Region::ApNortheast2 => "ap-northeast-2",
            Region::EuWest1 => "eu-west-1",
            Region::EuCentral1 => "eu-central-1",
            Region::SaEast1 => "sa-east-1",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported region '{0}' (expected one of: {})", REGION_CODES.join(", "))]
pub struct RegionParseError(pub String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.code() == s)
            .ok_or_else(|| RegionParseError(s.to_string()))
    }
}

impl TryFrom<String> for Region {
    type Error = RegionParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Region> for String {
    fn from(r: Region) -> Self {
        r.code().to_string()
    }
}
