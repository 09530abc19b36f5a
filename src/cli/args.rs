use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{BuildingType, Industry, Region, TimeBucket};
use crate::utils::constants::DEFAULT_DATA_DIR;

#[derive(Parser)]
#[command(name = "ems-analytics")]
#[command(about = "Facility energy-consumption analytics over processed parquet datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        default_value = DEFAULT_DATA_DIR,
        help = "Root directory of the processed datasets"
    )]
    pub data_dir: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summary metrics for one region/industry combination
    Metrics {
        #[arg(short, long)]
        region: Region,

        #[arg(short, long)]
        industry: Industry,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Summary metrics for all six region/industry combinations
    Overview {
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Filtered, time-bucketed consumption series
    Series {
        #[arg(short, long)]
        region: Region,

        #[arg(short, long)]
        industry: Industry,

        #[arg(short, long, default_value = "daily")]
        bucket: TimeBucket,

        #[arg(long, help = "Start date (YYYY-MM-DD), inclusive")]
        start: Option<NaiveDate>,

        #[arg(long, help = "End date (YYYY-MM-DD), inclusive")]
        end: Option<NaiveDate>,

        #[arg(long, default_value = "all")]
        building_type: BuildingType,

        #[arg(long, help = "Keep only rows with Total at or above this value")]
        min_total: Option<f64>,

        #[arg(long, default_value = "false", help = "Overlay mean daily temperature")]
        temperature: bool,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Component, classification and building-flag breakdowns
    Breakdown {
        #[arg(short, long)]
        region: Region,

        #[arg(short, long)]
        industry: Industry,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Display information about a processed parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10", help = "Sample rows to print")]
        sample: usize,
    },

    /// Write a filtered dataset back out as parquet
    Export {
        #[arg(short, long)]
        region: Region,

        #[arg(short, long)]
        industry: Industry,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long, default_value = "all")]
        building_type: BuildingType,

        #[arg(long)]
        min_total: Option<f64>,

        #[arg(short, long, help = "Output parquet file path")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_series_command() {
        let cli = Cli::parse_from([
            "ems-analytics",
            "series",
            "--region",
            "kansai",
            "--industry",
            "transport",
            "--bucket",
            "weekly",
            "--start",
            "2013-01-01",
            "--end",
            "2013-06-30",
            "--building-type",
            "tenant",
        ]);
        match cli.command {
            Commands::Series {
                region,
                industry,
                bucket,
                start,
                building_type,
                ..
            } => {
                assert_eq!(region, Region::Kansai);
                assert_eq!(industry, Industry::Transport);
                assert_eq!(bucket, TimeBucket::Weekly);
                assert_eq!(start, NaiveDate::from_ymd_opt(2013, 1, 1));
                assert_eq!(building_type, BuildingType::Tenant);
            }
            _ => panic!("expected series command"),
        }
    }

    #[test]
    fn test_parse_breakdown_command() {
        let cli = Cli::parse_from([
            "ems-analytics",
            "breakdown",
            "--region",
            "kanto",
            "--industry",
            "all",
            "--json",
        ]);
        match cli.command {
            Commands::Breakdown {
                region,
                industry,
                json,
            } => {
                assert_eq!(region, Region::Kanto);
                assert_eq!(industry, Industry::All);
                assert!(json);
            }
            _ => panic!("expected breakdown command"),
        }
    }
}
