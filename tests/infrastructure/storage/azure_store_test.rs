use minutes::domain::{JobId, StoragePath};
use minutes::infrastructure::storage::AzureStagingStore;

const ACCESS_KEY: &str = "c2VjcmV0LWtleQ==";

#[test]
fn given_sas_token_when_building_blob_url_then_appends_query_without_duplicate_marker() {
    let store =
        AzureStagingStore::new("minutesstage", ACCESS_KEY, "audio", Some("?sv=2024&sig=abc"))
            .unwrap();
    let job_id = JobId::new();
    let path = StoragePath::new(&job_id, "meeting.wav");

    let url = store.blob_url(&path);

    assert_eq!(
        url,
        format!(
            "https://minutesstage.blob.core.windows.net/audio/{}/meeting.wav?sv=2024&sig=abc",
            job_id
        )
    );
}

#[test]
fn given_no_sas_token_when_building_blob_url_then_returns_plain_url() {
    let store = AzureStagingStore::new("minutesstage", ACCESS_KEY, "audio", Some("")).unwrap();
    let path = StoragePath::new(&JobId::new(), "meeting.wav");

    let url = store.blob_url(&path);

    assert!(url.starts_with("https://minutesstage.blob.core.windows.net/audio/"));
    assert!(!url.contains('?'));
}

fn staged_store() -> AzureStagingStore {
    AzureStagingStore::new("minutesstage", ACCESS_KEY, "audio", Some("?sv=2024&sig=abc")).unwrap()
}

#[test]
fn given_file_name_with_hash_when_building_blob_url_then_keeps_sas_query_intact() {
    let job_id = JobId::new();
    let path = StoragePath::new(&job_id, "meeting #1.wav");

    let url = staged_store().blob_url(&path);

    assert_eq!(
        url,
        format!(
            "https://minutesstage.blob.core.windows.net/audio/{}/meeting%20%25231.wav?sv=2024&sig=abc",
            job_id
        )
    );
    assert!(!url.contains('#'));
}

#[test]
fn given_percent_in_file_name_when_building_blob_url_then_encodes_stored_key_once_more() {
    let path = StoragePath::new(&JobId::new(), "50%.wav");

    let url = staged_store().blob_url(&path);

    assert!(url.contains("/50%2525.wav?sv=2024&sig=abc"));
}

#[test]
fn given_non_ascii_file_name_when_building_blob_url_then_url_is_ascii() {
    let path = StoragePath::new(&JobId::new(), "定例 会議.wav");

    let url = staged_store().blob_url(&path);

    assert!(url.is_ascii());
    assert!(url.contains("%25E5%25AE%259A"));
    assert!(url.ends_with(".wav?sv=2024&sig=abc"));
}
