use anyhow::{Context, Result};
use bbox::{QuadriBox, QuadriBoxes, RectNum, HW};
use clap::Parser;
use log::info;
use prettytable::{cell, row, Table};
use std::path::{Path, PathBuf};
use train::{
    config::Config,
    utils::{find_latest_checkpoint, DEFAULT_CHECKPOINT_SUFFIX},
};

#[derive(Debug, Clone, Parser)]
/// Utilities for rotated object detection experiments.
enum Opts {
    /// Find the checkpoint file to resume from in a directory.
    LatestCheckpoint {
        /// checkpoint directory
        dir: PathBuf,
        /// checkpoint file extension
        #[clap(long, default_value = DEFAULT_CHECKPOINT_SUFFIX)]
        suffix: String,
    },
    /// Print the data pipeline of the test dataset.
    TestPipeline {
        /// configuration file
        config_file: PathBuf,
    },
    /// Print the checkpoint file selected by the configuration.
    Resume {
        /// configuration file
        config_file: PathBuf,
        /// checkpoint file extension
        #[clap(long, default_value = DEFAULT_CHECKPOINT_SUFFIX)]
        suffix: String,
    },
    /// Print the geometry of a quadrilateral box.
    QuadInfo {
        /// image height
        #[clap(long)]
        height: f64,
        /// image width
        #[clap(long)]
        width: f64,
        /// corners in x1 y1 x2 y2 x3 y3 x4 y4 order
        #[clap(required = true, allow_hyphen_values = true)]
        coords: Vec<f64>,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::LatestCheckpoint { dir, suffix } => latest_checkpoint(dir, &suffix)?,
        Opts::TestPipeline { config_file } => test_pipeline(config_file)?,
        Opts::Resume {
            config_file,
            suffix,
        } => resume(config_file, &suffix)?,
        Opts::QuadInfo {
            height,
            width,
            coords,
        } => quad_info(height, width, &coords)?,
    }

    Ok(())
}

fn latest_checkpoint(dir: impl AsRef<Path>, suffix: &str) -> Result<()> {
    match find_latest_checkpoint(dir, suffix)? {
        Some(path) => println!("{}", path.display()),
        None => println!("no checkpoint found"),
    }
    Ok(())
}

fn open_config(config_file: &Path) -> Result<Config> {
    Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))
}

fn test_pipeline(config_file: impl AsRef<Path>) -> Result<()> {
    let config = open_config(config_file.as_ref())?;
    let pipeline = config.test_pipeline()?;
    info!("found {} pipeline steps", pipeline.len());

    let mut table = Table::new();
    table.add_row(row!["index", "type", "args"]);

    pipeline.iter().enumerate().for_each(|(index, step)| {
        let args = step
            .args
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(row![index, step.kind, args]);
    });

    table.printstd();
    Ok(())
}

fn resume(config_file: impl AsRef<Path>, suffix: &str) -> Result<()> {
    let config = open_config(config_file.as_ref())?;

    match config.checkpoint_to_load(suffix)? {
        Some(path) => println!("{}", path.display()),
        None => println!("start from scratch"),
    }
    Ok(())
}

fn quad_info(height: f64, width: f64, coords: &[f64]) -> Result<()> {
    let img_shape = HW::try_from_hw([height, width])?;
    let quad = QuadriBox::try_from_slice(coords)?;
    let boxes = QuadriBoxes::from_quads(&[quad]);

    let [cx, cy] = quad.center();
    let rect = quad.bounding_rect();
    let [t, l, b, r] = rect.tlbr();
    let center_inside = boxes.is_bboxes_inside(&img_shape)[[0]];
    let all_inside = boxes.is_inside(&img_shape, true, 0.0)[[0]];

    let mut table = Table::new();
    table.add_row(row!["property", "value"]);
    table.add_row(row!["center", format!("({:.3}, {:.3})", cx, cy)]);
    table.add_row(row!["area", format!("{:.3}", quad.area())]);
    table.add_row(row!["width", format!("{:.3}", quad.width())]);
    table.add_row(row!["height", format!("{:.3}", quad.height())]);
    table.add_row(row![
        "bounding tlbr",
        format!("[{:.3}, {:.3}, {:.3}, {:.3}]", t, l, b, r)
    ]);
    table.add_row(row!["center inside", center_inside]);
    table.add_row(row!["all corners inside", all_inside]);
    table.add_row(row![
        "bounding rect inside",
        rect.is_within(img_shape.h(), img_shape.w())
    ]);
    table.printstd();

    Ok(())
}
