use anyhow::{Context, Result};
use clap::Parser;
use invoice_generator::core::{Orientation, PageSize, PdfConfig, StorageConfig};
use invoice_generator::emission::{remote_bucket, EmissionRouter, EmissionTarget, InvoiceSequence};
use invoice_generator::{InvoiceGenerator, InvoiceRenderer, S3Client};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Generador de facturas PDF con datos ficticios.
#[derive(Parser)]
#[command(author, version, about = "Generador de facturas PDF")]
struct Cli {
    /// Nombre de la empresa que emite las facturas
    empresa: String,

    /// Cantidad de facturas a generar
    cantidad: u64,

    /// Directorio de salida para los archivos PDF
    directorio: PathBuf,

    /// Prefijo de la clave remota (p. ej. `facturas/2024/`)
    #[arg(long, default_value = "")]
    prefix: String,

    /// Escribe siempre en disco aunque haya un bucket configurado
    #[arg(long)]
    no_upload: bool,

    /// Archivo de configuración del almacenamiento remoto
    #[arg(long, default_value = "invoicegen.toml")]
    config: PathBuf,

    /// Semilla para obtener lotes reproducibles
    #[arg(long)]
    seed: Option<u64>,

    /// Tamaño de página: letter, a4 o legal
    #[arg(long, default_value = "letter")]
    paper: PageSize,

    /// Página apaisada
    #[arg(long)]
    landscape: bool,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Validación antes de producir cualquier documento
    let sequence = InvoiceSequence::random(&mut rng, cli.cantidad)?;

    let storage = StorageConfig::load(&cli.config)
        .with_context(|| format!("leyendo {}", cli.config.display()))?;

    let target = match remote_bucket(&storage, cli.no_upload) {
        Some(bucket) => {
            tracing::info!(bucket, prefix = %cli.prefix, "remote upload enabled");
            EmissionTarget::Remote {
                bucket: bucket.to_string(),
                prefix: cli.prefix.clone(),
                uploader: Arc::new(S3Client::from_config(&storage).await?),
            }
        }
        None => {
            // Crear directorio si no existe
            std::fs::create_dir_all(&cli.directorio)
                .with_context(|| format!("creando {}", cli.directorio.display()))?;
            EmissionTarget::Local {
                output_dir: cli.directorio.clone(),
            }
        }
    };

    let orientation = if cli.landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    let renderer = InvoiceRenderer::new(
        PdfConfig::builder()
            .page_size(cli.paper)
            .orientation(orientation)
            .build(),
    );
    let router = EmissionRouter::new(InvoiceGenerator::new(), renderer, target);

    let report = router.run(&mut rng, &cli.empresa, &sequence).await?;
    for emission in &report.emissions {
        println!("Factura generada: {}", emission);
    }

    tracing::info!(
        written = report.written(),
        uploaded = report.uploaded(),
        failed = report.failed(),
        "done"
    );
    Ok(())
}
