use crate::analyzers::{
    aggregate_total, apply_filters, breakdown, compute_metrics, overview_combinations, profile,
    with_temperature,
};
use crate::cli::args::{Cli, Commands};
use crate::error::{AnalyticsError, Result};
use crate::models::{FilterCriteria, MetricsResult, RecordTable};
use crate::readers::{file_info, DatasetStore};
use crate::utils::constants::{
    CLUSTER_COLUMN, CONTRACT_POWER_PREFIX, FLOOR_AREA_PREFIX, LOAD_SIGNATURE_COLUMN,
};
use crate::utils::progress::ProgressReporter;
use crate::writers::TableWriter;

pub fn run(cli: Cli) -> Result<()> {
    let store = DatasetStore::new(&cli.data_dir);

    match cli.command {
        Commands::Metrics {
            region,
            industry,
            json,
        } => {
            let table = store.load_dataset(region, industry);
            let metrics = compute_metrics(region, industry, table.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print_metrics(&metrics);
            }
        }

        Commands::Overview { json } => {
            let combos = overview_combinations();
            let progress =
                ProgressReporter::new(combos.len() as u64, "Computing overview metrics...", json);

            let mut results = Vec::with_capacity(combos.len());
            for (region, industry) in combos {
                let table = store.load_dataset(region, industry);
                results.push(compute_metrics(region, industry, table.as_deref()));
                progress.increment(1);
            }
            progress.finish_with_message("Overview complete");

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for metrics in &results {
                    print_metrics(metrics);
                    println!();
                }
            }
        }

        Commands::Series {
            region,
            industry,
            bucket,
            start,
            end,
            building_type,
            min_total,
            temperature,
            json,
        } => {
            let table = store.load_dataset(region, industry).ok_or_else(|| {
                AnalyticsError::MissingData(format!("no data for {} {}", region, industry))
            })?;

            let criteria = FilterCriteria {
                start_date: start,
                end_date: end,
                building_type,
                min_total,
            };
            let filtered = apply_filters(&table, &criteria);
            let series = aggregate_total(&filtered, bucket);

            let overlay = if temperature {
                store
                    .load_temperature(region)
                    .map(|temp| with_temperature(&series, &temp))
            } else {
                None
            };

            if json {
                match &overlay {
                    Some(points) => println!("{}", serde_json::to_string_pretty(points)?),
                    None => println!("{}", serde_json::to_string_pretty(&series)?),
                }
            } else {
                println!(
                    "{} {} consumption, {} buckets ({} of {} rows kept)",
                    region,
                    industry,
                    series.len(),
                    filtered.num_rows(),
                    table.num_rows()
                );
                match &overlay {
                    Some(points) => {
                        for (point, temp) in points {
                            match temp {
                                Some(t) => {
                                    println!("{:12} {:>12.1} kWh {:>6.1} C", point.label, point.total, t)
                                }
                                None => println!("{:12} {:>12.1} kWh      -", point.label, point.total),
                            }
                        }
                    }
                    None => {
                        for point in &series {
                            println!("{:12} {:>12.1} kWh", point.label, point.total);
                        }
                    }
                }
            }
        }

        Commands::Breakdown {
            region,
            industry,
            json,
        } => {
            let table = store.load_dataset(region, industry).ok_or_else(|| {
                AnalyticsError::MissingData(format!("no data for {} {}", region, industry))
            })?;

            let components = breakdown::component_totals(&table);
            let signatures = breakdown::category_counts(&table, LOAD_SIGNATURE_COLUMN);
            let clusters = breakdown::category_counts(&table, CLUSTER_COLUMN);
            let floor_areas = breakdown::prefix_column_sums(&table, FLOOR_AREA_PREFIX);
            let contract_power = breakdown::prefix_column_sums(&table, CONTRACT_POWER_PREFIX);
            let (peak, off_peak) = profile::peak_offpeak(&table);

            if json {
                let out = serde_json::json!({
                    "region": region,
                    "industry": industry,
                    "components": components,
                    "load_signatures": signatures,
                    "clusters": clusters,
                    "floor_areas": floor_areas,
                    "contract_power": contract_power,
                    "peak_avg": peak,
                    "off_peak_avg": off_peak,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{} / {}", region, industry);
                print_pairs("Components (kWh)", &components);
                print_counts("Load signatures", &signatures);
                print_counts("Clusters", &clusters);
                print_pairs("Floor area flags", &floor_areas);
                print_pairs("Contract power flags", &contract_power);
                println!(
                    "  Peak vs off-peak:   {:.1} vs {:.1} kWh",
                    peak, off_peak
                );
            }
        }

        Commands::Info { file, sample } => {
            let info = file_info(&file)?;
            println!("{}", file.display());
            println!("{}", info.summary());

            let table = crate::readers::read_table(&file)?;
            println!("Columns ({}):", table.num_columns());
            for name in table.column_names() {
                println!("  {}", name);
            }

            if sample > 0 && !table.is_empty() {
                println!("\nFirst {} rows:", sample.min(table.num_rows()));
                print_rows(&table.head(sample));
            }
        }

        Commands::Export {
            region,
            industry,
            start,
            end,
            building_type,
            min_total,
            output,
        } => {
            let progress = ProgressReporter::new_spinner("Loading dataset...", false);
            let table = store.load_dataset(region, industry).ok_or_else(|| {
                AnalyticsError::MissingData(format!("no data for {} {}", region, industry))
            })?;

            let criteria = FilterCriteria {
                start_date: start,
                end_date: end,
                building_type,
                min_total,
            };
            let filtered = apply_filters(&table, &criteria);

            progress.set_message("Writing filtered rows...");
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            TableWriter::new().write_table(&filtered, &output)?;
            progress.finish_with_message(&format!(
                "Wrote {} of {} rows to {}",
                filtered.num_rows(),
                table.num_rows(),
                output.display()
            ));
        }
    }

    Ok(())
}

fn print_metrics(metrics: &MetricsResult) {
    println!("{} / {}", metrics.region, metrics.industry);
    println!("  Records:            {}", metrics.total_records);
    println!("  Avg consumption:    {:.1} kWh", metrics.avg_energy);
    println!("  Peak hour:          {}:00", metrics.peak_hour);
    println!(
        "  Weekend vs weekday: {:.1} vs {:.1} kWh",
        metrics.weekend_avg, metrics.weekday_avg
    );
    println!("  Date range:         {}", metrics.date_range);
    println!("  Dominant component: {}", metrics.dominant_component);
}

fn print_pairs(heading: &str, pairs: &[(String, f64)]) {
    if pairs.is_empty() {
        return;
    }
    println!("  {}:", heading);
    for (name, value) in pairs {
        println!("    {:32} {:>12.1}", name, value);
    }
}

fn print_counts(heading: &str, counts: &[(String, usize)]) {
    if counts.is_empty() {
        return;
    }
    println!("  {}:", heading);
    for (name, count) in counts {
        println!("    {:32} {:>12}", name, count);
    }
}

fn print_rows(table: &RecordTable) {
    for row in 0..table.num_rows() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|col| col.display_at(row).unwrap_or_else(|| "-".to_string()))
            .collect();
        println!("  {}", cells.join(" | "));
    }
}
