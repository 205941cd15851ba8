use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use geoagrisense::{
    config::ViewerConfig,
    dataset::DatasetLoader,
    feature::FeatureCollection,
    layer::Layer,
    legend, region,
    snapshot::SnapshotWriter,
    style::CropFilter,
    view::MapView,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "GeoAgriSense climate map core")]
struct Cli {
    /// Path to a viewer config YAML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Feature collection (YAML or GeoJSON); the bundled sample fields are used when omitted
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the styled frame for a selection as JSON
    Style(SelectionArgs),
    /// Print the legend for a layer name as JSON
    Legend { layer: String },
    /// Print the map center for a region as JSON
    Center { region: String },
    /// Write frames to the export directory, one per layer unless --layer is given
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Directory for exported frames
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Subdirectory name for this export
        #[arg(long, default_value = "sample")]
        label: String,
    },
    /// Serve the map dashboard
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, clap::Args)]
struct SelectionArgs {
    /// temperature, precipitation or crop-yield
    #[arg(long)]
    layer: Option<Layer>,
    /// "all" or a crop name
    #[arg(long)]
    crop: Option<CropFilter>,
    #[arg(long)]
    region: Option<String>,
    /// Layer opacity, 0 to 100
    #[arg(long)]
    opacity: Option<u8>,
}

impl SelectionArgs {
    fn apply(&self, view: &mut MapView) {
        if let Some(layer) = self.layer {
            view.set_layer(layer);
        }
        if let Some(crop) = self.crop {
            view.set_crop(crop);
        }
        if let Some(region) = &self.region {
            view.select_region(region);
        }
        if let Some(opacity) = self.opacity {
            view.set_opacity(opacity);
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_dataset(path: Option<&PathBuf>) -> Result<FeatureCollection> {
    match path {
        Some(path) => Ok(DatasetLoader::new(".").load(path)?),
        None => Ok(FeatureCollection::sample()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::from_yaml(path)?,
        None => ViewerConfig::default(),
    };
    init_logging(&config.logging.level);

    let dataset_path = cli.dataset.as_ref().or(config.dataset.as_ref());
    let mut view = config.view.build_view();

    match cli.command {
        Command::Style(selection) => {
            let dataset = load_dataset(dataset_path)?;
            selection.apply(&mut view);
            println!("{}", serde_json::to_string_pretty(&view.render(&dataset))?);
        }
        Command::Legend { layer } => {
            println!("{}", serde_json::to_string_pretty(&legend::render(&layer))?);
        }
        Command::Center { region } => {
            println!("{}", serde_json::to_string_pretty(&region::center_for(&region))?);
        }
        Command::Export {
            selection,
            output_dir,
            label,
        } => {
            let dataset = load_dataset(dataset_path)?;
            selection.apply(&mut view);
            let writer = SnapshotWriter::new(output_dir.unwrap_or(config.export.output_dir));
            let layers = match selection.layer {
                Some(layer) => vec![layer],
                None => Layer::ALL.to_vec(),
            };
            for path in writer.write_layers(&view, &dataset, &layers, &label)? {
                println!("{}", path.display());
            }
        }
        Command::Serve { host, port } => {
            let dataset = load_dataset(dataset_path)?;
            let server = WebServerConfig {
                dataset,
                view,
                host: host.unwrap_or(config.server.host),
                port: port.unwrap_or(config.server.port),
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::run(server))?;
            info!("dashboard stopped");
        }
    }
    Ok(())
}
