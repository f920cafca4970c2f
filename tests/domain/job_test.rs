use minutes::domain::{Job, JobId, JobStatus, JobTransitionError};

#[test]
fn given_new_job_when_created_then_is_processing_without_text() {
    let job = Job::new(JobId::new());

    assert_eq!(job.status, JobStatus::Processing);
    assert!(job.transcribed_text.is_none());
    assert!(job.summarized_text.is_none());
}

#[test]
fn given_processing_job_when_completed_then_stores_both_texts() {
    let mut job = Job::new(JobId::new());

    job.complete("transcript".to_string(), "summary".to_string())
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.transcribed_text.as_deref(), Some("transcript"));
    assert_eq!(job.summarized_text.as_deref(), Some("summary"));
}

#[test]
fn given_processing_job_when_failed_then_both_texts_carry_error_message() {
    let mut job = Job::new(JobId::new());

    job.fail("speech service unreachable").unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.transcribed_text.as_deref(),
        Some("Error: speech service unreachable")
    );
    assert_eq!(job.transcribed_text, job.summarized_text);
}

#[test]
fn given_completed_job_when_failing_then_returns_transition_error() {
    let mut job = Job::new(JobId::new());
    job.complete("t".to_string(), "s".to_string()).unwrap();

    let result = job.fail("late failure");

    assert_eq!(
        result,
        Err(JobTransitionError {
            from: JobStatus::Completed,
            to: JobStatus::Failed,
        })
    );
    assert_eq!(job.summarized_text.as_deref(), Some("s"));
}

#[test]
fn given_failed_job_when_completing_then_returns_transition_error() {
    let mut job = Job::new(JobId::new());
    job.fail("boom").unwrap();

    let result = job.complete("t".to_string(), "s".to_string());

    assert!(result.is_err());
    assert_eq!(job.status, JobStatus::Failed);
}

#[test]
fn given_job_statuses_when_formatting_then_uses_lowercase_names() {
    assert_eq!(JobStatus::Processing.as_str(), "processing");
    assert_eq!(JobStatus::Completed.to_string(), "completed");
    assert_eq!("failed".parse::<JobStatus>(), Ok(JobStatus::Failed));
}

#[test]
fn given_job_id_when_round_tripping_through_string_then_is_equal() {
    let id = JobId::new();

    let parsed: JobId = id.to_string().parse().unwrap();

    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<JobId>().is_err());
}
