// src/source.rs

use clap::ValueEnum;
use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// The market reports this tool knows how to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DataSourceId {
    /// PSE: generation per generating unit.
    #[value(name = "power-generation", alias = "generacja_mocy_jednostek_wytworczych")]
    PowerGeneration,
    /// PSE: basic power-system volumes.
    #[value(name = "basic-volumes", alias = "wielkosci_podstawowe")]
    BasicVolumes,
    /// TGE: day-ahead hour contracts.
    #[value(name = "hour-contracts", alias = "kontrakty_godzinowe")]
    HourContracts,
}

/// How a source's raw data is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherKind {
    DirectCsv,
    HtmlScrape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEntry {
    pub id: DataSourceId,
    pub cli_name: &'static str,
    /// Prefix of the output file name.
    pub label: &'static str,
    pub base_url: &'static str,
    pub fetcher_kind: FetcherKind,
}

static CATALOG: &[SourceEntry] = &[
    SourceEntry {
        id: DataSourceId::PowerGeneration,
        cli_name: "power-generation",
        label: "generacja_mocy_jednostek_wytworczych",
        base_url: "https://www.pse.pl/getcsv/-/export/csv/PL_GEN_MOC_JW_EPS/",
        fetcher_kind: FetcherKind::DirectCsv,
    },
    SourceEntry {
        id: DataSourceId::BasicVolumes,
        cli_name: "basic-volumes",
        label: "wielkosci_podstawowe",
        base_url: "https://www.pse.pl/getcsv/-/export/csv/PL_WYK_KSE/",
        fetcher_kind: FetcherKind::DirectCsv,
    },
    SourceEntry {
        id: DataSourceId::HourContracts,
        cli_name: "hour-contracts",
        label: "kontrakty_godzinowe",
        base_url: "https://tge.pl/energia-elektryczna-rdn?dateShow=",
        fetcher_kind: FetcherKind::HtmlScrape,
    },
];

/// Catalog entry for `id`. Every variant has exactly one entry.
pub fn resolve(id: DataSourceId) -> &'static SourceEntry {
    match id {
        DataSourceId::PowerGeneration => &CATALOG[0],
        DataSourceId::BasicVolumes => &CATALOG[1],
        DataSourceId::HourContracts => &CATALOG[2],
    }
}

/// Look a source up by CLI name or file label.
pub fn resolve_str(name: &str) -> Result<&'static SourceEntry> {
    name.parse::<DataSourceId>().map(resolve)
}

impl FromStr for DataSourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CATALOG
            .iter()
            .find(|e| e.cli_name == s || e.label == s)
            .map(|e| e.id)
            .ok_or_else(|| Error::UnknownSource(s.to_string()))
    }
}

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(resolve(*self).cli_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_total_and_consistent() {
        for id in DataSourceId::value_variants() {
            let entry = resolve(*id);
            assert_eq!(entry.id, *id);
            assert!(entry.base_url.starts_with("https://"));
        }
    }

    #[test]
    fn fetcher_kinds() {
        assert_eq!(
            resolve(DataSourceId::PowerGeneration).fetcher_kind,
            FetcherKind::DirectCsv
        );
        assert_eq!(
            resolve(DataSourceId::BasicVolumes).fetcher_kind,
            FetcherKind::DirectCsv
        );
        assert_eq!(
            resolve(DataSourceId::HourContracts).fetcher_kind,
            FetcherKind::HtmlScrape
        );
    }

    #[test]
    fn parses_cli_names_and_labels() {
        assert_eq!(
            "basic-volumes".parse::<DataSourceId>().unwrap(),
            DataSourceId::BasicVolumes
        );
        assert_eq!(
            "kontrakty_godzinowe".parse::<DataSourceId>().unwrap(),
            DataSourceId::HourContracts
        );
        assert_eq!(
            resolve_str("generacja_mocy_jednostek_wytworczych").unwrap().id,
            DataSourceId::PowerGeneration
        );
    }

    #[test]
    fn unknown_names_fail() {
        for bad in ["", "Basic-Volumes", "prices", "hour_contracts"] {
            match resolve_str(bad) {
                Err(Error::UnknownSource(s)) => assert_eq!(s, bad),
                other => panic!("expected UnknownSource for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_round_trips() {
        for id in DataSourceId::value_variants() {
            assert_eq!(id.to_string().parse::<DataSourceId>().unwrap(), *id);
        }
    }
}
