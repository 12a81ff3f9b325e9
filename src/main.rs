use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tourfolio::catalog::Catalog;
use tourfolio::placement::place_hotspots;
use tourfolio::server;
use tourfolio::site::SiteWriter;

/// Portfolio site generator for 360° panorama tours.
#[derive(Parser)]
#[command(name = "tourfolio")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the static site from a catalog
    Generate {
        /// Catalog file (.yaml)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Output directory for the generated site
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Built wasm package (wasm-pack output) to copy into <output>/pkg
        #[arg(long)]
        viz_pkg: Option<PathBuf>,
    },
    /// Start development server with hot reload
    Serve {
        /// Catalog file (.yaml)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Output directory for the generated site
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Built wasm package (wasm-pack output) to copy into <output>/pkg
        #[arg(long)]
        viz_pkg: Option<PathBuf>,
    },
    /// Assign seeded random positions to every hotspot in a catalog
    PlaceHotspots {
        /// Catalog file (.yaml)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Random seed; the same seed always yields the same positions
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Write the new positions back to the catalog instead of printing them
        #[arg(short, long)]
        write: bool,
    },
}

fn generate(catalog: &Path, output: &Path, writer: &SiteWriter) -> anyhow::Result<()> {
    let catalog = Catalog::load(catalog)?;
    writer.write(&catalog, output)?;
    println!(
        "Generated {} project pages in {}",
        catalog.projects.len(),
        output.display()
    );
    Ok(())
}

fn place(catalog_path: &Path, seed: u64, write: bool) -> anyhow::Result<()> {
    let mut catalog = Catalog::load(catalog_path)?;
    let placements = place_hotspots(&mut catalog, seed);

    if write {
        catalog.save(catalog_path)?;
        tracing::info!(
            hotspots = placements.len(),
            seed,
            catalog = %catalog_path.display(),
            "hotspot positions written"
        );
    } else {
        for placement in &placements {
            let [x, y, z] = placement.position;
            println!("{}: [{x:.3}, {y:.3}, {z:.3}]", placement.id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            catalog,
            output,
            viz_pkg,
        } => {
            generate(&catalog, &output, &SiteWriter::new().with_viz_pkg(viz_pkg))?;
        }
        Commands::Serve {
            catalog,
            output,
            port,
            viz_pkg,
        } => {
            server::serve(&catalog, &output, port, SiteWriter::new().with_viz_pkg(viz_pkg)).await?;
        }
        Commands::PlaceHotspots {
            catalog,
            seed,
            write,
        } => {
            place(&catalog, seed, write)?;
        }
    }

    Ok(())
}
