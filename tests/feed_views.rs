//! End-to-end view tests driven through an in-memory text source

use serde_json::json;

use myvax_fetcher::app::{
    CanonicalRegion, Count, DatasetKind, FeedCatalog, FeedService, StaticSource, View, ViewOutput,
    REGION_COUNT,
};
use myvax_fetcher::errors::{AppError, ErrorCondition, TableError, ViewError};

const VACC_HEADER: &str =
    "date,state,dose1_daily,dose2_daily,total_daily,dose1_cumul,dose2_cumul,total_cumul";

fn service(feeds: &[(DatasetKind, String)]) -> FeedService<StaticSource> {
    let catalog = FeedCatalog::default();
    let mut source = StaticSource::new();
    for (kind, text) in feeds {
        source.insert(&catalog.url_for(*kind).unwrap(), text.clone());
    }
    FeedService::new(source, catalog)
}

/// State vaccination feed: the first date lacks the last three regions, the
/// following dates cover all of them
fn state_vaccination_csv() -> String {
    let mut lines = vec![VACC_HEADER.to_string()];
    let dates = ["2021-06-01", "2021-06-02", "2021-06-03"];
    let regions = CanonicalRegion::ALL;
    for (day, date) in dates.iter().enumerate() {
        let covered = if day == 0 {
            REGION_COUNT - 3
        } else {
            REGION_COUNT
        };
        for (index, region) in regions[..covered].iter().enumerate() {
            let daily = (day * 100 + index) as i64;
            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                date,
                region.label(),
                daily,
                daily / 2,
                daily + daily / 2,
                daily * 3,
                daily,
                daily * 4
            ));
        }
    }
    lines.join("\n") + "\n"
}

fn national_vaccination_csv() -> String {
    "date,dose1_daily,dose2_daily,total_daily,dose1_cumul,dose2_cumul,total_cumul\n\
     2021-06-01,6,4,10,6,4,10\n\
     2021-06-02,12,8,20,18,12,30\n\
     2021-06-03,18,12,30,36,24,60\n"
        .to_string()
}

#[tokio::test]
async fn test_latest_national_vaccination_delta() {
    let service = service(&[(DatasetKind::NationalVaccination, national_vaccination_csv())]);

    let output = service.latest(DatasetKind::NationalVaccination).await.unwrap();
    let ViewOutput::Delta(delta) = &output else {
        panic!("Expected a delta record");
    };
    assert_eq!(delta.update.get("total"), Some(Count::new(10)));
    assert_eq!(delta.total.get("total"), Some(Count::new(30)));

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({
            "date": "2021-06-03",
            "previousDate": "2021-06-02",
            "update": { "dose1": 6, "dose2": 4, "total": 10 },
            "total": { "dose1": 18, "dose2": 12, "total": 30 }
        })
    );
}

#[tokio::test]
async fn test_list_all_preserves_file_order() {
    let service = service(&[(DatasetKind::NationalVaccination, national_vaccination_csv())]);

    let records = service
        .list_all(DatasetKind::NationalVaccination)
        .await
        .unwrap();
    let dates: Vec<_> = records.iter().filter_map(|record| record.date()).collect();
    assert_eq!(dates, ["2021-06-01", "2021-06-02", "2021-06-03"]);
}

#[tokio::test]
async fn test_by_region_all_groups_each_date_once() {
    let service = service(&[(DatasetKind::StateVaccination, state_vaccination_csv())]);

    let groups = service
        .by_region_all(DatasetKind::StateVaccination)
        .await
        .unwrap();
    let dates: Vec<_> = groups.iter().map(|group| group.date.as_str()).collect();
    assert_eq!(dates, ["2021-06-01", "2021-06-02", "2021-06-03"]);
    assert_eq!(groups[0].state_data.len(), REGION_COUNT - 3);
    assert_eq!(groups[2].state_data.len(), REGION_COUNT);

    // records inside a group carry the region but not the date
    let first = serde_json::to_value(&groups[1].state_data[0]).unwrap();
    assert_eq!(first["state"], "Johor");
    assert!(first.get("date").is_none());
}

#[tokio::test]
async fn test_by_region_filters_to_resolved_region() {
    let service = service(&[(DatasetKind::StateVaccination, state_vaccination_csv())]);

    let records = service
        .by_region(DatasetKind::StateVaccination, "kuala-lumpur")
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|record| record.region() == Some("W.P. Kuala Lumpur")));
    let dates: Vec<_> = records.iter().filter_map(|record| record.date()).collect();
    assert_eq!(dates, ["2021-06-02", "2021-06-03"]);
}

#[tokio::test]
async fn test_unknown_region_yields_empty_result() {
    let service = service(&[(DatasetKind::StateVaccination, state_vaccination_csv())]);

    let records = service
        .by_region(DatasetKind::StateVaccination, "unknown-place")
        .await
        .unwrap();
    assert!(records.is_empty());

    let latest = service
        .latest_by_region(DatasetKind::StateVaccination, "unknown-place")
        .await
        .unwrap();
    assert!(latest.is_empty());
}

#[tokio::test]
async fn test_latest_by_region_all_is_final_window() {
    let service = service(&[(DatasetKind::StateVaccination, state_vaccination_csv())]);

    let all = service
        .list_all(DatasetKind::StateVaccination)
        .await
        .unwrap();
    let latest = service
        .latest_by_region_all(DatasetKind::StateVaccination)
        .await
        .unwrap();

    assert_eq!(latest.len(), REGION_COUNT);
    assert_eq!(latest, all[all.len() - REGION_COUNT..]);

    // the state-level latest view is the same window
    let output = service.latest(DatasetKind::StateVaccination).await.unwrap();
    assert_eq!(output, ViewOutput::Records(latest));
}

#[tokio::test]
async fn test_latest_by_region_picks_one_row() {
    let service = service(&[(DatasetKind::StateVaccination, state_vaccination_csv())]);

    let records = service
        .latest_by_region(DatasetKind::StateVaccination, "pulau-pinang")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].region(), Some("Pulau Pinang"));
    assert_eq!(records[0].date(), Some("2021-06-03"));
}

#[tokio::test]
async fn test_empty_fields_become_null_and_propagate() {
    let csv = "date,total,phase2,mysj,call,web,children,elderly,comorb,oku\n\
               2021-06-01,100,40,80,10,10,0,30,20,5\n\
               2021-06-02,150,,120,15,15,0,45,30,7\n";
    let service = service(&[(DatasetKind::NationalRegistration, csv.to_string())]);

    let records = service
        .list_all(DatasetKind::NationalRegistration)
        .await
        .unwrap();
    let last = serde_json::to_value(&records[1]).unwrap();
    assert_eq!(last["phase2"], serde_json::Value::Null);
    assert_eq!(last["platform"]["mysj"], 120);

    let output = service
        .latest(DatasetKind::NationalRegistration)
        .await
        .unwrap();
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["update"]["total"], 50);
    assert_eq!(value["update"]["phase2"], serde_json::Value::Null);
    assert_eq!(value["total"]["oku"], 7);
}

#[tokio::test]
async fn test_population_by_region() {
    let csv = "state,idxs,pop,pop_18,pop_60\n\
               Malaysia,0,32657400,23409600,3502000\n\
               Pulau Pinang,9,1773600,1366800,263100\n\
               W.P. Labuan,15,99600,69600,7100\n";
    let service = service(&[(DatasetKind::Population, csv.to_string())]);

    let output = service
        .run(DatasetKind::Population, View::ByRegion, Some("labuan"))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!([{
            "stateName": "W.P. Labuan",
            "popGroup": { "total": 99600, "age18to59": 69600, "age60plus": 7100 }
        }])
    );
}

#[tokio::test]
async fn test_error_conditions() {
    let service = service(&[
        (
            DatasetKind::NationalVaccination,
            "date,total_daily\n2021-06-01,10\n".to_string(),
        ),
        (
            DatasetKind::NationalRegistration,
            "date,total\n2021-06-01,1,2\n".to_string(),
        ),
    ]);

    let insufficient = service
        .latest(DatasetKind::NationalVaccination)
        .await
        .unwrap_err();
    assert!(matches!(
        insufficient,
        AppError::View(ViewError::InsufficientData { rows: 1, .. })
    ));
    assert_eq!(insufficient.condition(), ErrorCondition::BadUpstreamData);

    let malformed = service
        .list_all(DatasetKind::NationalRegistration)
        .await
        .unwrap_err();
    assert!(matches!(
        malformed,
        AppError::Table(TableError::FieldCountMismatch { .. })
    ));
    assert_eq!(malformed.condition(), ErrorCondition::BadUpstreamData);

    let unsupported = service
        .run(DatasetKind::NationalVaccination, View::ByRegionAll, None)
        .await
        .unwrap_err();
    assert_eq!(unsupported.condition(), ErrorCondition::BadRequest);

    let unavailable = service
        .list_all(DatasetKind::Population)
        .await
        .unwrap_err();
    assert_eq!(unavailable.condition(), ErrorCondition::ServiceUnavailable);
}
