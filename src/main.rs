use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use hunger_pipeline::config::Config;
use hunger_pipeline::constants;
use hunger_pipeline::datasets::ghi::{self, GhiPeriod};
use hunger_pipeline::datasets::indicators::{self, Indicator};
use hunger_pipeline::datasets::{poverty, prices};
use hunger_pipeline::fetch::{DatasetFetcher, DatasetSnapshot, HttpSource};
use hunger_pipeline::logging;
use hunger_pipeline::pipeline::filter::PriceBand;
use hunger_pipeline::views;
use hunger_pipeline::views::prices::PriceFilters;

#[derive(Parser)]
#[command(name = "hunger_pipeline")]
#[command(about = "Global hunger and poverty dashboard data pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Food price map: clean, filter, and summarize market price entries
    Prices {
        /// Price band to keep: all, low, high
        #[arg(long, default_value = "all")]
        band: String,
        /// Maximum market entries kept per country
        #[arg(long)]
        limit: Option<usize>,
        /// Print the market detail table for one country
        #[arg(long)]
        country: Option<String>,
    },
    /// Hunger trends map: GHI scores per country over the reporting periods
    Hunger {
        /// Reporting year: 2000, 2008, 2016, or 2024
        #[arg(long, default_value_t = 2024)]
        year: i32,
        /// Print the score history for one country
        #[arg(long)]
        country: Option<String>,
    },
    /// Worst affected countries: severity-ranked bar charts
    Worst {
        /// Reporting year for the GHI chart
        #[arg(long, default_value_t = 2024)]
        year: i32,
        /// Also chart an indicator: undernourishment, child-wasting, child-mortality
        #[arg(long)]
        indicator: Option<String>,
        /// Reference period for the indicator chart
        #[arg(long)]
        period: Option<String>,
    },
    /// Poverty map: poverty rates per country and year
    Poverty {
        /// Print the poverty history for one ISO country code
        #[arg(long)]
        iso: Option<String>,
    },
}

async fn fetch_dataset(
    fetcher: &DatasetFetcher,
    name: &str,
    url: &str,
    timeout: Duration,
) -> anyhow::Result<DatasetSnapshot> {
    let source = HttpSource::new(name, url, timeout)?;
    Ok(fetcher.fetch_snapshot_or_empty(&source).await)
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "no data".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    let config = match Config::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load '{}' ({}); using defaults", cli.config, e);
            Config::default()
        }
    };

    let timeout = Duration::from_secs(config.fetch.timeout_seconds);
    let fetcher = DatasetFetcher::new(&config.fetch);

    match cli.command {
        Commands::Prices { band, limit, country } => {
            let band = PriceBand::parse(&band)
                .ok_or_else(|| anyhow::anyhow!("unknown price band '{}'", band))?;

            let snapshot = fetch_dataset(
                &fetcher,
                constants::FOOD_PRICES_DATASET,
                &config.datasets.food_prices,
                timeout,
            )
            .await?;

            let rows = prices::parse_rows(&snapshot.records);
            let parsed = rows.len();
            let cleaned = views::prices::clean_rows(rows);
            let filters = PriceFilters {
                band,
                per_country_cap: limit.unwrap_or(constants::DEFAULT_MARKET_CAP),
            };
            let filtered = views::prices::apply_filters(cleaned, &filters);
            let points = views::prices::map_points(&filtered);
            info!("Price map built with {} points", points.len());

            println!("\n📊 Food price summary:");
            println!("   Raw records: {}", snapshot.records.len());
            println!("   Parsed rows: {}", parsed);
            println!("   After cleaning and filters: {}", filtered.len());
            println!("   Map points: {}", points.len());

            if let Some(country) = country {
                let detail = views::prices::country_detail(&filtered, &country);
                if detail.is_empty() {
                    println!("\n⚠️  No market entries for {}", country);
                } else {
                    println!("\n🏪 Markets in {}:", country);
                    for entry in detail {
                        println!(
                            "   {} | {} | {} | ${} / {}",
                            entry.year.map_or("----".to_string(), |y| y.to_string()),
                            entry.market,
                            entry.commodity,
                            fmt_value(entry.price_usd),
                            entry.unit
                        );
                    }
                }
            }
        }
        Commands::Hunger { year, country } => {
            let period = GhiPeriod::from_year(year)?;

            let snapshot = fetch_dataset(
                &fetcher,
                constants::GHI_TRENDS_DATASET,
                &config.datasets.ghi_trends,
                timeout,
            )
            .await?;

            let rows = ghi::parse_trend_rows(&snapshot.records);
            let layer = views::hunger_trends::choropleth(&rows, period);
            let average = views::hunger_trends::global_average(&rows, period);

            println!("\n🌍 Hunger trends, {} report:", year);
            println!("   Countries mapped: {}", layer.len());
            println!("   Global average GHI: {}", fmt_value(average.value()));

            if let Some(country) = country {
                match views::hunger_trends::country_history(&rows, &country) {
                    Some(history) => {
                        println!("\n📈 GHI history for {}:", history.country);
                        for point in history.scores {
                            println!("   {}: {}", point.year, fmt_value(point.value));
                        }
                    }
                    None => println!("\n⚠️  No GHI data for {}", country),
                }
            }
        }
        Commands::Worst { year, indicator, period } => {
            let ghi_period = GhiPeriod::from_year(year)?;

            let snapshot = fetch_dataset(
                &fetcher,
                constants::GHI_SCORES_DATASET,
                &config.datasets.ghi_scores,
                timeout,
            )
            .await?;

            let rows = ghi::parse_score_rows(&snapshot.records);
            let bars = views::worst_affected::ghi_bar_chart(&rows, ghi_period);
            let average_change = views::worst_affected::average_change_since_2016(&rows);

            println!("\n📉 Worst affected countries, {} report:", year);
            println!("   Countries charted: {}", bars.len());
            println!(
                "   Average change since 2016: {}%",
                fmt_value(average_change.value())
            );
            for bar in bars.iter().take(10) {
                println!("   {}: {}", bar.label, fmt_value(bar.value));
            }

            if let Some(name) = indicator {
                let indicator = Indicator::parse(&name)?;
                let period = period.unwrap_or_else(|| indicator.default_period().to_string());

                let snapshot = fetch_dataset(
                    &fetcher,
                    constants::GHI_INDICATORS_DATASET,
                    &config.datasets.ghi_indicators,
                    timeout,
                )
                .await?;

                let rows = indicators::parse_rows(&snapshot.records);
                let bars = views::worst_affected::indicator_bar_chart(&rows, indicator, &period)?;

                println!("\n📊 {} ({}):", indicator.label(), period);
                println!("   Countries with data: {}", bars.len());
                for bar in bars.iter().take(10) {
                    println!("   {}: {}", bar.label, fmt_value(bar.value));
                }
            }
        }
        Commands::Poverty { iso } => {
            let snapshot = fetch_dataset(
                &fetcher,
                constants::POVERTY_DATASET,
                &config.datasets.poverty,
                timeout,
            )
            .await?;

            let rows = poverty::parse_rows(&snapshot.records);
            let years = views::poverty::observed_years(&rows);

            println!("\n🌍 Poverty summary:");
            println!("   Observations: {}", rows.len());
            match (years.first(), years.last()) {
                (Some(first), Some(last)) => {
                    println!("   Years covered: {} to {}", first, last);
                    let frame = views::poverty::frame_for_year(&rows, *last);
                    println!("   Countries in latest frame: {}", frame.len());
                }
                _ => println!("   Years covered: none"),
            }

            let averages = views::poverty::average_rate_by_year(&rows);
            if let Some((year, rate)) = averages.last() {
                println!(
                    "   Global average rate in {}: {}%",
                    year,
                    fmt_value(rate.value())
                );
            }

            if let Some(iso) = iso {
                match views::poverty::country_history(&rows, &iso) {
                    Some(history) => {
                        println!("\n📈 Poverty history for {} ({}):", history.country, iso);
                        for point in history.points {
                            println!("   {}: {}%", point.year, fmt_value(point.value));
                        }
                        println!(
                            "   Overall change: {}%",
                            fmt_value(history.overall_change.value())
                        );
                        println!(
                            "   Annual growth rate: {}%",
                            fmt_value(history.annual_growth_rate.value())
                        );
                    }
                    None => println!("\n⚠️  No poverty data for {}", iso),
                }
            }
        }
    }

    Ok(())
}
