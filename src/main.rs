use clap::Parser;
use yijia_catalog::core::source::source_from_spec;
use yijia_catalog::utils::{logger, validation::Validate};
use yijia_catalog::{CatalogEngine, CatalogPipeline, CliConfig, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting yijia-catalog CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let source = match source_from_spec(&config.source) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code().max(1));
        }
    };
    tracing::info!("📚 Source: {}", source.describe());

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
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
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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
