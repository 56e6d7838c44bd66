use hunger_pipeline::config::FetchConfig;
use hunger_pipeline::datasets::ghi::{self, GhiPeriod};
use hunger_pipeline::datasets::{poverty, prices};
use hunger_pipeline::fetch::{DatasetFetcher, StaticSource};
use hunger_pipeline::pipeline::aggregate::{aggregate, group_by};
use hunger_pipeline::pipeline::filter::PriceBand;
use hunger_pipeline::views;
use hunger_pipeline::views::prices::PriceFilters;

fn fetcher() -> DatasetFetcher {
    DatasetFetcher::new(&FetchConfig {
        timeout_seconds: 1,
        retry_attempts: 1,
        retry_backoff_ms: 1,
    })
}

const PRICES_CSV: &str = "\
latitude,longitude,usdprice,Source_Country,admin1,admin2,market,commodity,unit,date
12.11,15.05,0.75,Chad,Chari-Baguirmi,N'Djamena,Atrone,Rice,KG,2021-01-15
12.11,15.05,1.20,Chad,Chari-Baguirmi,N'Djamena,Atrone,Millet,KG,2022-01-15
12.11,15.05,2.80,Chad,Chari-Baguirmi,N'Djamena,Atrone,Sorghum,KG,2023-01-15
12.11,15.05,4.50,Chad,Chari-Baguirmi,N'Djamena,Atrone,Wage (non-skilled labour),DAY,2023-01-15
12.11,15.05,1.10,Chad,Chari-Baguirmi,N'Djamena,Diguel,Diesel,L,2023-01-15
12.11,15.05,120.00,Chad,Chari-Baguirmi,N'Djamena,Atrone,Livestock (goat),HEAD,2023-01-15
13.51,2.11,—,Niger,Niamey,Niamey,Katako,Maize,KG,2023-01-15
13.51,2.11,0.95,Niger,Niamey,Niamey,Katako,Maize,KG,2023-06-15
13.51,2.11,25.00,Niger,Niamey,Niamey,Katako,Oil (vegetable),L,2023-06-15
";

#[tokio::test]
async fn test_food_price_flow_end_to_end() {
    let source = StaticSource::new("food_prices", PRICES_CSV);
    let snapshot = fetcher().fetch_snapshot(&source).await.unwrap();
    assert_eq!(snapshot.records.len(), 9);

    let rows = prices::parse_rows(&snapshot.records);
    let cleaned = views::prices::clean_rows(rows);

    // Wage, fuel, implausible price, and placeholder rows are all gone
    assert_eq!(cleaned.len(), 5);
    assert!(cleaned.iter().all(|row| !row.commodity.contains("Wage")));
    assert!(cleaned
        .iter()
        .all(|row| row.usd_price.value().is_some_and(|p| p < 50.0)));

    // Low band drops the $25 vegetable oil entry
    let filters = PriceFilters {
        band: PriceBand::Low,
        per_country_cap: 2,
    };
    let filtered = views::prices::apply_filters(cleaned, &filters);
    assert_eq!(filtered.len(), 3);

    // Chad keeps its two most recent entries
    let chad: Vec<&str> = filtered
        .iter()
        .filter(|row| row.country == "Chad")
        .map(|row| row.commodity.as_str())
        .collect();
    assert_eq!(chad, vec!["Sorghum", "Millet"]);

    let points = views::prices::map_points(&filtered);
    assert_eq!(points.len(), 3);
    assert!(points[0].hover_text.contains("Market: Atrone"));

    let detail = views::prices::country_detail(&filtered, "Chad");
    assert_eq!(detail.len(), 2);
    assert_eq!(detail[0].year, Some(2023));
}

#[tokio::test]
async fn test_ragged_and_blank_rows_survive_parsing() {
    let csv = "\
latitude,longitude,usdprice,Source_Country,admin1,admin2,market,commodity,unit,date
12.11,15.05,0.75,Chad,Chari-Baguirmi,N'Djamena,Atrone,Rice,KG
,,,,,,,,,
12.11,15.05,0.80,Chad,Chari-Baguirmi,N'Djamena,Atrone,Rice,KG,2022-01-15
";
    let source = StaticSource::new("food_prices", csv);
    let snapshot = fetcher().fetch_snapshot(&source).await.unwrap();

    let rows = prices::parse_rows(&snapshot.records);
    assert_eq!(rows.len(), 2);
    // The short row is padded, so its missing date yields no year
    assert_eq!(rows[0].year, None);
    assert_eq!(rows[1].year, Some(2022));
}

const GHI_SCORES_CSV: &str = "\
Country with data from,2000 '98-'02,2008 '06-'10,2016 '14-'18,2024 '19-'23,Absolute change since 2016,% change since 2016
Chad,50.5,44.7,36.4,36.4,0.0,0.0
Belarus,<5,<5,<5,<5,—,—
Yemen,41.2,36.6,40.1,41.2,1.1,2.7
";

#[tokio::test]
async fn test_ghi_scores_flow_with_censored_values() {
    let source = StaticSource::new("ghi_scores", GHI_SCORES_CSV);
    let snapshot = fetcher().fetch_snapshot(&source).await.unwrap();

    let rows = ghi::parse_score_rows(&snapshot.records);
    assert_eq!(rows.len(), 3);

    let bars = views::worst_affected::ghi_bar_chart(&rows, GhiPeriod::Y2024);
    assert_eq!(bars.len(), 3);
    // Censored "<5" keeps its bar slot as a null with the no-data color
    assert_eq!(bars[1].value, None);
    assert_eq!(bars[1].color, "#ccc");
    // 36.4 sits in the alarming band
    assert_eq!(bars[0].color, "#fdae61");

    let average = views::worst_affected::average_change_since_2016(&rows);
    // Only Chad (0%) and Yemen contribute
    let expected = ((41.2 - 40.1) / 40.1 * 100.0) / 2.0;
    assert!((average.value().unwrap() - expected).abs() < 1e-9);
}

const POVERTY_CSV: &str = "\
ISO_Code,Country,Year,Poverty_Rate
TCD,Chad,2003,61.9
TCD,Chad,2011,38.8
TCD,Chad,2018,30.9
NER,Niger,2011,50.3
NER,Niger,2018,45.4
";

#[tokio::test]
async fn test_poverty_flow_end_to_end() {
    let source = StaticSource::new("poverty", POVERTY_CSV);
    let snapshot = fetcher().fetch_snapshot(&source).await.unwrap();

    let rows = poverty::parse_rows(&snapshot.records);
    assert_eq!(views::poverty::observed_years(&rows), vec![2003, 2011, 2018]);

    let frame = views::poverty::frame_for_year(&rows, 2018);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame[0].location, "TCD");

    let history = views::poverty::country_history(&rows, "TCD").unwrap();
    assert_eq!(history.points.len(), 3);
    // Poverty fell, so both change figures are negative
    assert!(history.overall_change.value().unwrap() < 0.0);
    assert!(history.annual_growth_rate.value().unwrap() < 0.0);
}

#[tokio::test]
async fn test_failed_fetch_degrades_to_empty_views() {
    struct DeadSource;

    #[async_trait::async_trait]
    impl hunger_pipeline::fetch::DatasetSource for DeadSource {
        fn name(&self) -> &str {
            "dead"
        }

        async fn fetch_text(&self) -> hunger_pipeline::error::Result<String> {
            Err(hunger_pipeline::error::PipelineError::Dataset {
                message: "connection refused".to_string(),
            })
        }
    }

    let snapshot = fetcher().fetch_snapshot_or_empty(&DeadSource).await;
    assert!(snapshot.is_empty());

    let rows = poverty::parse_rows(&snapshot.records);
    assert!(views::poverty::observed_years(&rows).is_empty());
    assert!(views::poverty::average_rate_by_year(&rows).is_empty());
    assert!(views::poverty::country_history(&rows, "TCD").is_none());
}

#[test]
fn test_group_members_match_filtering_by_key() {
    let source = hunger_pipeline::pipeline::parser::parse_csv(POVERTY_CSV).unwrap();
    let rows = poverty::parse_rows(&source);

    let groups = group_by(rows.clone(), |row| row.iso_code.clone());
    for group in &groups {
        let refiltered: Vec<_> = rows
            .iter()
            .filter(|row| row.iso_code == group.key)
            .cloned()
            .collect();
        assert_eq!(group.members, refiltered);

        let agg = aggregate(group.members.iter().map(|row| row.poverty_rate));
        assert_eq!(agg.count, group.members.len());
    }
}
