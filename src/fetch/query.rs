use std::fmt;
use std::str::FromStr;

/// Region filter understood by the products API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    /// The whole country; no region restriction.
    #[default]
    Brasil,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Brasil,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Value sent as `regiao`; empty for the whole country.
    pub fn param(self) -> String {
        match self {
            Region::Brasil => String::new(),
            other => other.name().to_lowercase(),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| {
                r.name().eq_ignore_ascii_case(wanted)
                    || r.name().replace('-', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| anyhow::anyhow!("unknown region: {}", wanted))
    }
}

/// Server-side selection of the sales data. Also the record store's cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SalesQuery {
    pub region: Region,
    /// `None` requests the whole period.
    pub year: Option<i32>,
}

impl SalesQuery {
    pub fn new(region: Region, year: Option<i32>) -> Self {
        Self { region, year }
    }

    /// Query-string pairs in request order. Both keys are always sent.
    pub fn pairs(&self) -> [(&'static str, String); 2] {
        [
            ("regiao", self.region.param()),
            ("ano", self.year.map(|y| y.to_string()).unwrap_or_default()),
        ]
    }

    /// Appends this query to `url`.
    pub fn apply(&self, url: &mut reqwest::Url) {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in self.pairs() {
            pairs.append_pair(key, &value);
        }
    }
}
