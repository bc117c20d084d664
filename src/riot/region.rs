use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

const API_DOMAIN: &str = "api.riotgames.com";

/// Platform routing values (Summoner-v4, League-v4). Players and caches are keyed per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Platform {
    BR1,
    LA1,
    LA2,
    NA1,
    JP1,
    KR,
    EUN1,
    EUW1,
    ME1,
    RU,
    TR1,
    OC1,
    PH2,
    SG2,
    TH2,
    TW2,
    VN2,
}

struct PlatformInfo {
    code: &'static str,
    /// Short names players type in URLs (`euw`, `oce`).
    aliases: &'static [&'static str],
    region: Region,
}

/// Indexed by `Platform as usize`; keep in declaration order.
const PLATFORMS: [PlatformInfo; 17] = [
    PlatformInfo { code: "br1", aliases: &["br"], region: Region::Americas },
    PlatformInfo { code: "la1", aliases: &["lan"], region: Region::Americas },
    PlatformInfo { code: "la2", aliases: &["las"], region: Region::Americas },
    PlatformInfo { code: "na1", aliases: &["na"], region: Region::Americas },
    PlatformInfo { code: "jp1", aliases: &["jp"], region: Region::Asia },
    PlatformInfo { code: "kr", aliases: &[], region: Region::Asia },
    PlatformInfo { code: "eun1", aliases: &["eune", "eun"], region: Region::Europe },
    PlatformInfo { code: "euw1", aliases: &["euw"], region: Region::Europe },
    PlatformInfo { code: "me1", aliases: &["me"], region: Region::Europe },
    PlatformInfo { code: "ru", aliases: &[], region: Region::Europe },
    PlatformInfo { code: "tr1", aliases: &["tr"], region: Region::Europe },
    PlatformInfo { code: "oc1", aliases: &["oce", "oc"], region: Region::Sea },
    PlatformInfo { code: "ph2", aliases: &["ph"], region: Region::Sea },
    PlatformInfo { code: "sg2", aliases: &["sg"], region: Region::Sea },
    PlatformInfo { code: "th2", aliases: &["th"], region: Region::Sea },
    PlatformInfo { code: "tw2", aliases: &["tw"], region: Region::Sea },
    PlatformInfo { code: "vn2", aliases: &["vn"], region: Region::Sea },
];

const ALL_PLATFORMS: [Platform; 17] = [
    Platform::BR1,
    Platform::LA1,
    Platform::LA2,
    Platform::NA1,
    Platform::JP1,
    Platform::KR,
    Platform::EUN1,
    Platform::EUW1,
    Platform::ME1,
    Platform::RU,
    Platform::TR1,
    Platform::OC1,
    Platform::PH2,
    Platform::SG2,
    Platform::TH2,
    Platform::TW2,
    Platform::VN2,
];

impl Platform {
    fn info(self) -> &'static PlatformInfo {
        &PLATFORMS[self as usize]
    }

    pub fn host(&self) -> String {
        format!("{}.{API_DOMAIN}", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        self.info().code
    }

    /// Regional cluster serving this platform's accounts and matches.
    pub fn to_region(self) -> Region {
        self.info().region
    }

    /// Account-v1 has no `sea` cluster; those players are served from `asia`.
    pub fn account_region(self) -> Region {
        match self.to_region() {
            Region::Sea => Region::Asia,
            region => region,
        }
    }
}

impl FromStr for Platform {
    type Err = AppError;

    /// Accepts the routing code (`EUW1`) or the usual short name (`euw`), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_PLATFORMS
            .into_iter()
            .find(|p| {
                let info = p.info();
                info.code.eq_ignore_ascii_case(wanted)
                    || info.aliases.iter().any(|a| a.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| AppError::InvalidRegion(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.to_string()
    }
}

/// Regional routing values (Account-v1, Match-v5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl Region {
    pub fn host(&self) -> String {
        format!("{}.{API_DOMAIN}", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Sea => "sea",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which host family a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    Platform,
    Regional,
    Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_table_matches_declaration_order() {
        for platform in ALL_PLATFORMS {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn platform_parses_short_and_long_codes() {
        assert_eq!("euw".parse::<Platform>().unwrap(), Platform::EUW1);
        assert_eq!("EUW1".parse::<Platform>().unwrap(), Platform::EUW1);
        assert_eq!("kr".parse::<Platform>().unwrap(), Platform::KR);
        assert_eq!("Oce".parse::<Platform>().unwrap(), Platform::OC1);
        assert!(matches!(
            "moon".parse::<Platform>(),
            Err(AppError::InvalidRegion(_))
        ));
    }

    #[test]
    fn platform_maps_to_regional_host() {
        assert_eq!(Platform::EUW1.to_region(), Region::Europe);
        assert_eq!(Platform::NA1.to_region(), Region::Americas);
        assert_eq!(Platform::VN2.to_region(), Region::Sea);
        assert_eq!(Platform::EUW1.host(), "euw1.api.riotgames.com");
        assert_eq!(Region::Europe.host(), "europe.api.riotgames.com");
        assert_eq!(Platform::EUN1.to_string(), "EUN1");
    }

    #[test]
    fn sea_accounts_are_served_from_asia() {
        assert_eq!(Platform::OC1.account_region(), Region::Asia);
        assert_eq!(Platform::VN2.account_region(), Region::Asia);
        assert_eq!(Platform::KR.account_region(), Region::Asia);
        assert_eq!(Platform::EUW1.account_region(), Region::Europe);
        assert_eq!(Platform::NA1.account_region(), Region::Americas);
    }
}
