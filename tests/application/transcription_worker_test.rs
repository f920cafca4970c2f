use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::sync::mpsc;

use minutes::application::ports::JobRepository;
use minutes::application::services::{
    JobSubmitter, SubmitError, TranscriptionWorker, UploadedMedia,
};
use minutes::domain::{JobId, JobStatus, TranscriptContent, TranscriptionJobStatus};

use crate::helpers::{
    CountingLlmClient, FakeDocumentDelivery, PipelineFixture, RecordingJobRepository,
    RecordingStagingStore, SUMMARY, ScriptedSpeechService,
};

fn upload(name: &str, data: &[u8]) -> (UploadedMedia, PathBuf) {
    let media = UploadedMedia::create(name).unwrap();
    std::fs::write(media.path(), data).unwrap();
    let dir = media.path().parent().unwrap().to_path_buf();
    (media, dir)
}

async fn wait_for_status(repository: &RecordingJobRepository, id: JobId, status: JobStatus) {
    for _ in 0..500 {
        if repository.job(id).await.status == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached {}", id, status);
}

async fn wait_until_removed(path: &Path) {
    for _ in 0..500 {
        if !path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} was never removed", path.display());
}

#[test]
fn given_name_with_directories_when_creating_upload_then_keeps_only_file_name() {
    let media = UploadedMedia::create("../../etc/meeting.wav").unwrap();

    assert_eq!(media.file_name(), "meeting.wav");
    let dir_name = media.path().parent().unwrap().file_name().unwrap();
    assert!(dir_name.to_string_lossy().starts_with("minutes-upload-"));
}

#[tokio::test]
async fn given_submitted_upload_when_worker_runs_then_job_completes_and_upload_is_removed() {
    let fixture = PipelineFixture::succeeding("会議の記録");
    let repository = fixture.repository.clone();
    let (sender, receiver) = mpsc::channel(8);
    let worker = TranscriptionWorker::new(receiver, Arc::new(fixture.pipeline));
    let submitter = JobSubmitter::new(sender, repository.clone());
    let (media, upload_dir) = upload("meeting.wav", b"RIFF");

    let job_id = submitter.submit(media, None).await.unwrap();
    let queued = repository.get_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(queued.status, JobStatus::Processing);

    tokio::spawn(worker.run());
    wait_for_status(&repository, job_id, JobStatus::Completed).await;
    wait_until_removed(&upload_dir).await;

    let job = repository.job(job_id).await;
    assert_eq!(job.transcribed_text.as_deref(), Some("会議の記録"));
    assert_eq!(job.summarized_text.as_deref(), Some(SUMMARY));
}

#[tokio::test]
async fn given_several_uploads_when_worker_runs_then_every_job_completes_independently() {
    let fixture = PipelineFixture::succeeding("text");
    let repository = fixture.repository.clone();
    let (sender, receiver) = mpsc::channel(8);
    let worker = TranscriptionWorker::new(receiver, Arc::new(fixture.pipeline));
    let submitter = JobSubmitter::new(sender, repository.clone());
    tokio::spawn(worker.run());

    let mut ids = Vec::new();
    for name in ["a.wav", "b.mp3", "c.m4a"] {
        let (media, _) = upload(name, b"data");
        ids.push(submitter.submit(media, None).await.unwrap());
    }

    for id in ids {
        wait_for_status(&repository, id, JobStatus::Completed).await;
    }
    assert_eq!(repository.complete_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn given_long_running_jobs_when_more_are_submitted_then_every_job_starts_without_waiting() {
    let still_running = ScriptedSpeechService::new(
        vec![TranscriptionJobStatus::Running],
        Vec::new(),
        TranscriptContent {
            combined: Vec::new(),
            phrases: Vec::new(),
        },
    );
    let fixture = PipelineFixture::new(
        RecordingStagingStore::default(),
        still_running,
        CountingLlmClient::default(),
        FakeDocumentDelivery::with_team_site(),
    );
    let repository = fixture.repository.clone();
    let speech = fixture.speech.clone();
    let (sender, receiver) = mpsc::channel(16);
    let worker = TranscriptionWorker::new(receiver, Arc::new(fixture.pipeline));
    let submitter = JobSubmitter::new(sender, repository.clone());
    tokio::spawn(worker.run());

    let job_count = 8;
    for i in 0..job_count {
        let (media, _) = upload(&format!("meeting-{}.wav", i), b"RIFF");
        submitter.submit(media, None).await.unwrap();
    }

    for _ in 0..500 {
        if speech.submit_calls.load(Ordering::SeqCst) == job_count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(speech.submit_calls.load(Ordering::SeqCst), job_count);
    assert_eq!(repository.complete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(repository.fail_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_stopped_worker_when_submitting_then_returns_unavailable_and_fails_job() {
    let repository = Arc::new(RecordingJobRepository::default());
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);
    let submitter = JobSubmitter::new(sender, repository.clone());
    let (media, upload_dir) = upload("meeting.wav", b"RIFF");

    let result = submitter.submit(media, None).await;

    assert!(matches!(result, Err(SubmitError::WorkerUnavailable)));
    assert_eq!(repository.fail_calls.load(Ordering::SeqCst), 1);
    assert!(!upload_dir.exists());
}
