//! Record projection
//!
//! Turns one [`RawRow`] into the nested output record for its dataset kind.
//! Every numeric field goes through [`Count::parse`], so a missing or
//! non-numeric value shows up as `null` in the output and the rest of the
//! record is still produced.

use serde::Serialize;

use crate::app::models::{Count, Coverage, DatasetKind, RecordShape};
use crate::app::table::RawRow;
use crate::constants::columns;

/// Which identifying fields a projected record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Date and, for state-level kinds, region
    Full,
    /// Region only; used inside a date group where the date is implied
    Region,
}

/// First dose, second dose and combined counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseCounts {
    pub dose1: Count,
    pub dose2: Count,
    pub total: Count,
}

/// Vaccination counts for one date, optionally one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaccinationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub daily: DoseCounts,
    pub total: DoseCounts,
}

/// Registrations by channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub mysj: Count,
    pub call: Count,
    pub web: Count,
}

/// Registrations by demographic group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demographic {
    pub children: Count,
    pub elderly: Count,
    pub comorb: Count,
    pub oku: Count,
}

/// Cumulative registrations for one date, optionally one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub total: Count,
    pub phase2: Count,
    pub platform: Platform,
    pub demographic: Demographic,
}

/// Population by age band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopGroup {
    pub total: Count,
    pub age18to59: Count,
    pub age60plus: Count,
}

/// Population of one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationRecord {
    pub state_name: String,
    pub pop_group: PopGroup,
}

/// A projected record of any dataset kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Vaccination(VaccinationRecord),
    Registration(RegistrationRecord),
    Population(PopulationRecord),
}

impl Record {
    /// Region label carried by the record, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            Record::Vaccination(record) => record.state.as_deref(),
            Record::Registration(record) => record.state.as_deref(),
            Record::Population(record) => Some(&record.state_name),
        }
    }

    /// Date carried by the record, if any
    pub fn date(&self) -> Option<&str> {
        match self {
            Record::Vaccination(record) => record.date.as_deref(),
            Record::Registration(record) => record.date.as_deref(),
            Record::Population(_) => None,
        }
    }
}

/// Project one row into the record shape of `kind`
pub fn project(row: &RawRow, kind: DatasetKind, scope: Scope) -> Record {
    let date = match scope {
        Scope::Full => Some(text(row, columns::DATE)),
        Scope::Region => None,
    };
    let state = match kind.coverage() {
        Coverage::State => Some(text(row, columns::REGION)),
        Coverage::National | Coverage::Static => None,
    };

    match kind.shape() {
        RecordShape::Vaccination => Record::Vaccination(VaccinationRecord {
            date,
            state,
            daily: DoseCounts {
                dose1: count(row, "dose1_daily"),
                dose2: count(row, "dose2_daily"),
                total: count(row, "total_daily"),
            },
            total: DoseCounts {
                dose1: count(row, "dose1_cumul"),
                dose2: count(row, "dose2_cumul"),
                total: count(row, "total_cumul"),
            },
        }),
        RecordShape::Registration => Record::Registration(RegistrationRecord {
            date,
            state,
            total: count(row, "total"),
            phase2: count(row, "phase2"),
            platform: Platform {
                mysj: count(row, "mysj"),
                call: count(row, "call"),
                web: count(row, "web"),
            },
            demographic: Demographic {
                children: count(row, "children"),
                elderly: count(row, "elderly"),
                comorb: count(row, "comorb"),
                oku: count(row, "oku"),
            },
        }),
        RecordShape::Population => Record::Population(PopulationRecord {
            state_name: text(row, columns::REGION),
            pop_group: PopGroup {
                total: count(row, "pop"),
                age18to59: count(row, "pop_18"),
                age60plus: count(row, "pop_60"),
            },
        }),
    }
}

/// Numeric field; a missing column is treated like an unparsable value
pub(crate) fn count(row: &RawRow, column: &str) -> Count {
    row.get(column).map(Count::parse).unwrap_or(Count::NAN)
}

fn text(row: &RawRow, column: &str) -> String {
    row.get(column).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::table::Table;
    use serde_json::json;

    fn first_row(text: &str) -> RawRow {
        Table::parse(text).unwrap().rows()[0].clone()
    }

    #[test]
    fn test_national_vaccination_shape() {
        let row = first_row(
            "date,dose1_daily,dose2_daily,total_daily,dose1_cumul,dose2_cumul,total_cumul\n\
             2021-06-01,100,50,150,1000,500,1500\n",
        );
        let record = project(&row, DatasetKind::NationalVaccination, Scope::Full);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "date": "2021-06-01",
                "daily": {"dose1": 100, "dose2": 50, "total": 150},
                "total": {"dose1": 1000, "dose2": 500, "total": 1500}
            })
        );
    }

    #[test]
    fn test_state_registration_shape() {
        let row = first_row(
            "date,state,total,phase2,mysj,call,web,children,elderly,comorb,oku\n\
             2021-06-01,Johor,900,400,700,50,150,10,300,200,20\n",
        );
        let record = project(&row, DatasetKind::StateRegistration, Scope::Full);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "date": "2021-06-01",
                "state": "Johor",
                "total": 900,
                "phase2": 400,
                "platform": {"mysj": 700, "call": 50, "web": 150},
                "demographic": {"children": 10, "elderly": 300, "comorb": 200, "oku": 20}
            })
        );
    }

    #[test]
    fn test_region_scope_omits_date() {
        let row = first_row("date,state,dose1_daily\n2021-06-01,Perak,7\n");
        let record = project(&row, DatasetKind::StateVaccination, Scope::Region);

        assert_eq!(record.date(), None);
        assert_eq!(record.region(), Some("Perak"));
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("date").is_none());
        assert_eq!(value["daily"]["dose1"], 7);
    }

    #[test]
    fn test_population_shape() {
        let row = first_row("state,idxs,pop,pop_18,pop_60\nJohor,1,3781000,2711900,413800\n");
        let record = project(&row, DatasetKind::Population, Scope::Full);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "stateName": "Johor",
                "popGroup": {"total": 3781000, "age18to59": 2711900, "age60plus": 413800}
            })
        );
    }

    #[test]
    fn test_unparsable_fields_become_sentinel() {
        let row = first_row("date,dose1_daily,dose2_daily,total_daily\n2021-06-01,,abc,12x\n");
        let record = project(&row, DatasetKind::NationalVaccination, Scope::Full);

        let Record::Vaccination(vaccination) = record else {
            panic!("Expected a vaccination record");
        };
        assert!(vaccination.daily.dose1.is_nan());
        assert!(vaccination.daily.dose2.is_nan());
        assert_eq!(vaccination.daily.total, Count::new(12));
        // cumulative columns are absent from this feed
        assert!(vaccination.total.total.is_nan());
        assert_ne!(vaccination.daily.dose1, Count::new(0));
    }
}
