use crate::core::{Pipeline, Result};
use crate::utils::monitor::SystemMonitor;

pub struct CatalogEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CatalogEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting catalog export...");

        // Extract
        let institutions = self.pipeline.extract().await?;
        tracing::info!("Extracted {} institutions", institutions.len());
        self.monitor.log_stats("extract");

        // Transform
        let bundle = self.pipeline.transform(institutions).await?;
        tracing::info!("Prepared {} institutions for export", bundle.institutions.len());
        self.monitor.log_stats("transform");

        // Load
        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("load");

        if self.monitor.is_enabled() {
            self.monitor.log_final_stats();
        }

        Ok(output_path)
    }
}
