//! Filter selections applied to the record store before analysis.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{common::MonthRef, record::MovementRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Sectors included in an analysis.
pub enum SectorScope {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl SectorScope {
    /// Builds a scope from sector names; an empty list means every sector.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            SectorScope::All
        } else {
            SectorScope::Only(set)
        }
    }

    pub fn includes(&self, sector: &str) -> bool {
        match self {
            SectorScope::All => true,
            SectorScope::Only(sectors) => sectors.contains(sector),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SectorScope::All => "all sectors".to_string(),
            SectorScope::Only(sectors) => sectors.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Year/month/sector selection driving one analysis request.
pub struct Selection {
    pub month: MonthRef,
    pub sectors: SectorScope,
}

impl Selection {
    pub fn new(month: MonthRef, sectors: SectorScope) -> Self {
        Self { month, sectors }
    }

    /// Same sectors, same month of the previous year.
    pub fn prior_year(&self) -> Self {
        Self {
            month: self.month.previous_year(),
            sectors: self.sectors.clone(),
        }
    }

    /// Whether an inpatient record falls inside the selected month and sectors.
    pub fn matches(&self, record: &MovementRecord) -> bool {
        record.is_inpatient()
            && self.month.contains(record.date)
            && self.sectors.includes(&record.sector)
    }
}
