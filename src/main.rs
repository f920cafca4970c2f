use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use minutes::application::ports::{DocumentDelivery, JobRepository};
use minutes::application::services::{
    DocumentDeliveryService, JobSubmitter, PollPolicy, SummarizationConfig, SummarizationService,
    TranscriptionPipeline, TranscriptionService, TranscriptionWorker,
};
use minutes::infrastructure::documents::{DocxRenderer, GraphClient};
use minutes::infrastructure::llm::create_llm_client;
use minutes::infrastructure::media::FfmpegConverter;
use minutes::infrastructure::observability::{TracingConfig, init_tracing};
use minutes::infrastructure::persistence::InMemoryJobRepository;
use minutes::infrastructure::speech::AzureSpeechClient;
use minutes::infrastructure::storage::StagingStoreFactory;
use minutes::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let staging_store =
        StagingStoreFactory::create(&settings.storage).context("Failed to create blob storage")?;
    let media_converter = Arc::new(FfmpegConverter::new(&settings.media.ffmpeg_path));

    let speech_client = Arc::new(AzureSpeechClient::new(
        &settings.speech.endpoint,
        &settings.speech.api_key,
        &settings.speech.locale,
        settings.speech.diarization,
    ));
    let poll_policy = PollPolicy {
        initial_interval: Duration::from_secs(settings.speech.poll_initial_interval_secs),
        max_interval: Duration::from_secs(settings.speech.poll_max_interval_secs),
        timeout: Duration::from_secs(settings.speech.poll_timeout_secs),
    };
    let transcription_service = Arc::new(TranscriptionService::new(
        speech_client,
        poll_policy,
        settings.speech.rendering,
    ));

    let llm_client =
        Arc::new(create_llm_client(&settings.llm).context("Failed to create LLM client")?);
    let summarization_service = Arc::new(SummarizationService::new(
        llm_client,
        SummarizationConfig {
            max_tokens_per_chunk: settings.summarization.max_tokens_per_chunk,
            batch_size: settings.summarization.batch_size,
            final_reduction: settings.summarization.final_reduction,
            language: settings.summarization.language.clone(),
        },
    ));

    let document_delivery: Option<Arc<dyn DocumentDelivery>> = settings
        .sharepoint
        .as_ref()
        .map(|sharepoint| Arc::new(GraphClient::new(sharepoint)) as Arc<dyn DocumentDelivery>);
    if document_delivery.is_none() {
        tracing::warn!("SharePoint is not configured; document delivery is disabled");
    }
    let document_delivery_service = document_delivery.as_ref().map(|delivery| {
        Arc::new(DocumentDeliveryService::new(
            Arc::new(DocxRenderer::new()),
            Arc::clone(delivery),
        ))
    });

    let pipeline = Arc::new(TranscriptionPipeline::new(
        Arc::clone(&job_repository),
        media_converter,
        staging_store,
        transcription_service,
        summarization_service,
        document_delivery_service,
    ));

    let (sender, receiver) = mpsc::channel(settings.pipeline.queue_capacity.max(1));
    let worker = TranscriptionWorker::new(receiver, pipeline);
    tokio::spawn(worker.run());

    let state = AppState {
        job_repository: Arc::clone(&job_repository),
        job_submitter: JobSubmitter::new(sender, job_repository),
        document_delivery,
        max_upload_bytes: settings.server.max_upload_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
