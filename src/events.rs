//! # Dropsonde catalogue
//!
//! Discrete launch records `{sonde_id, launch_time, flag, platform}` and the
//! [`SondeCatalogue`] that orders them by launch time and answers the range/flag queries
//! used to attach sondes to segments and to cross-check curated segment files.
//!
//! Range semantics
//! -----------------
//! A sonde belongs to a segment when `start <= launch_time < end`. Records without a
//! platform match every platform.
use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{SondeFlag, SondeId, SondesByFlag, UnixTime},
    flightphase_errors::FlightPhaseError,
    time::parse_timestamp,
};

/// A single dropsonde launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SondeRecord {
    pub sonde_id: SondeId,
    pub launch_time: UnixTime,
    pub flag: SondeFlag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl SondeRecord {
    pub fn new(sonde_id: impl Into<SondeId>, launch_time: UnixTime, flag: SondeFlag) -> Self {
        SondeRecord {
            sonde_id: sonde_id.into(),
            launch_time,
            flag,
            platform: None,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    fn matches_platform(&self, platform: Option<&str>) -> bool {
        match (platform, self.platform.as_deref()) {
            (Some(wanted), Some(own)) => wanted == own,
            _ => true,
        }
    }
}

/// Row layout of a CSV sonde catalogue.
#[derive(Debug, Deserialize)]
struct CsvSondeRow {
    sonde_id: String,
    launch_time: String,
    flag: String,
    #[serde(default)]
    platform: Option<String>,
}

/// Launch records ordered by launch time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SondeCatalogue {
    records: Vec<SondeRecord>,
}

impl SondeCatalogue {
    /// Build a catalogue, sorting the records by launch time (stable for equal times)
    pub fn new(mut records: Vec<SondeRecord>) -> Self {
        records.sort_by(|a, b| a.launch_time.total_cmp(&b.launch_time));
        SondeCatalogue { records }
    }

    /// Read a catalogue from CSV with the columns `sonde_id,launch_time,flag[,platform]`.
    ///
    /// `launch_time` is either unix seconds or an ISO 8601 date. An empty `platform`
    /// cell means the record applies to every platform.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, FlightPhaseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let records = csv_reader
            .deserialize::<CsvSondeRow>()
            .map(|row| {
                let row = row?;
                Ok(SondeRecord {
                    sonde_id: row.sonde_id,
                    launch_time: parse_timestamp(&row.launch_time)?,
                    flag: row.flag.parse()?,
                    platform: row.platform.filter(|p| !p.is_empty()),
                })
            })
            .collect::<Result<Vec<_>, FlightPhaseError>>()?;

        Ok(SondeCatalogue::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SondeRecord] {
        &self.records
    }

    /// Records with `start <= launch_time < end`, in launch order
    pub fn in_range(&self, start: UnixTime, end: UnixTime) -> &[SondeRecord] {
        let lower = self.records.partition_point(|r| r.launch_time < start);
        let upper = self.records.partition_point(|r| r.launch_time < end).max(lower);
        &self.records[lower..upper]
    }

    /// Records of a platform within `[start, end)`, in launch order
    pub fn in_range_for<'a>(
        &'a self,
        start: UnixTime,
        end: UnixTime,
        platform: Option<&'a str>,
    ) -> impl Iterator<Item = &'a SondeRecord> + 'a {
        self.in_range(start, end)
            .iter()
            .filter(move |r| r.matches_platform(platform))
    }

    /// Sonde ids launched within `[start, end)`, grouped by flag.
    ///
    /// Every flag is present in the result, possibly with an empty list.
    pub fn ids_by_flag(
        &self,
        start: UnixTime,
        end: UnixTime,
        platform: Option<&str>,
    ) -> SondesByFlag {
        let mut by_flag: SondesByFlag = SondeFlag::ALL.iter().map(|&f| (f, Vec::new())).collect();
        for record in self.in_range_for(start, end, platform) {
            by_flag
                .entry(record.flag)
                .or_default()
                .push(record.sonde_id.clone());
        }
        by_flag
    }

    /// Number of sondes with `flag` launched within `[start, end)`
    pub fn count(
        &self,
        flag: SondeFlag,
        start: UnixTime,
        end: UnixTime,
        platform: Option<&str>,
    ) -> usize {
        self.in_range_for(start, end, platform)
            .filter(|r| r.flag == flag)
            .count()
    }

    /// First launch, of any flag, within `[start, end)`
    pub fn first_launch(
        &self,
        start: UnixTime,
        end: UnixTime,
        platform: Option<&str>,
    ) -> Option<&SondeRecord> {
        self.in_range(start, end)
            .iter()
            .find(|r| r.matches_platform(platform))
    }

    /// Whole catalogue partitioned by flag, each group ordered by launch time
    pub fn group_by_flag(&self) -> BTreeMap<SondeFlag, Vec<&SondeRecord>> {
        let mut groups: BTreeMap<SondeFlag, Vec<&SondeRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.flag).or_default().push(record);
        }
        groups
    }
}

impl FromIterator<SondeRecord> for SondeCatalogue {
    fn from_iter<I: IntoIterator<Item = SondeRecord>>(iter: I) -> Self {
        SondeCatalogue::new(iter.into_iter().collect())
    }
}
