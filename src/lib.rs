mod chart;
pub mod extract;
#[cfg(feature = "hdf5")]
pub mod hdf5_store;
pub mod input;
mod log;
pub mod output;
mod pdf;
pub mod report;
pub mod series;
pub mod store;
pub mod utils;
use extract::ExtractionStats;
use indexmap::IndexMap;
use input::Config;
use series::CulvertSeries;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use store::{JsonStore, StoreFormat};

pub fn run(input_args: &InputArgs) -> Result<(), Box<dyn Error>> {
    log::show_greeting();

    let begin = Instant::now();
    let config = input::read_config_input(&input_args.path)?;

    log::input_reading_line(&config.input_path, &config.root_path);

    // The store is closed before rendering starts.
    let (series, stats) = read_culvert_series(&config)?;
    log::extraction_summary(&series, &stats, config.minutes_per_step);

    let num_pages = report::render_report(
        &series,
        config.minutes_per_step,
        &config.output_path,
    )?;
    log::report_written(&config.output_path, num_pages);

    if let Some(summary_path) = &config.summary_path {
        output::write_summary_table(
            &series,
            config.minutes_per_step,
            summary_path,
        )?;
        log::summary_table_line(summary_path);
    }

    log::show_farewell(begin.elapsed());

    Ok(())
}

fn read_culvert_series(
    config: &Config,
) -> Result<(IndexMap<String, CulvertSeries>, ExtractionStats), Box<dyn Error>>
{
    let options = config.extract_options();
    match StoreFormat::from_path(&config.input_path) {
        StoreFormat::Json => {
            let store = JsonStore::open(&config.input_path)?;
            let root = store.subtree(&config.root_path)?;
            Ok(extract::extract_culvert_series(&root, &options)?)
        }
        #[cfg(feature = "hdf5")]
        StoreFormat::Hdf5 => {
            let store = hdf5_store::Hdf5Store::open(&config.input_path)?;
            let root = store.subtree(&config.root_path)?;
            Ok(extract::extract_culvert_series(&root, &options)?)
        }
        #[cfg(not(feature = "hdf5"))]
        StoreFormat::Hdf5 => Err(store::StoreError::Unsupported(format!(
            "{} looks like an HDF5 file; rebuild with `--features hdf5` to read it",
            config.input_path.display()
        ))
        .into()),
    }
}

pub struct InputArgs {
    pub path: PathBuf,
}

impl InputArgs {
    pub fn build(args: &[String]) -> Result<Self, &'static str> {
        if args.len() < 2 {
            return Err("Not enough arguments [CONFIG]");
        }

        let path = PathBuf::from(&args[1]);

        Ok(Self { path })
    }
}
