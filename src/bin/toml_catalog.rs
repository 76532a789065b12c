use clap::Parser;
use yijia_catalog::core::ConfigProvider;
use yijia_catalog::utils::{logger, validation::Validate};
use yijia_catalog::{CatalogEngine, CatalogPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-catalog")]
#[command(about = "Catalog export driven by a TOML job file")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "catalog.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Validate and list what would be exported without writing files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based catalog export");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let source = config.build_source()?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config, source.as_ref()).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CatalogPipeline::new(source, storage, config);
    let engine = CatalogEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Catalog export completed successfully!");
            println!("✅ Catalog export completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Catalog export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Job: {} v{}", config.job.name, config.job.version);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.source.r#type);
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    if let Some(zip) = config.zip_filename() {
        println!("  Compression: {} (ZIP)", zip);
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

async fn perform_dry_run(
    config: &TomlConfig,
    source: &dyn yijia_catalog::core::CatalogSource,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!("  Source: {}", source.describe());

    let institutions: Vec<_> = source
        .load()
        .await?
        .into_iter()
        .map(yijia_catalog::Institution::normalized)
        .collect();
    yijia_catalog::domain::model::validate_catalog(&institutions)?;
    println!("  ✅ {} institutions passed validation", institutions.len());

    let catalog = yijia_catalog::Catalog::new(institutions);
    let selected = catalog.search(&config.query());
    println!("  📊 {} institutions selected for export:", selected.len());
    for inst in selected {
        println!(
            "    [{}] {} ¥{}/月 ⭐{}",
            inst.id, inst.name, inst.price_range, inst.rating
        );
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
