mod common;

use common::FakeCloud;
use dropkeep_cloud::{
    CloudError, OperationStatus, PendingOperation, PowerStatus, WaitConfig, wait_for_operation,
    wait_for_power_off,
};
use std::time::Duration;

fn config() -> WaitConfig {
    WaitConfig::fixed(Duration::from_secs(2), Duration::from_secs(30))
}

#[tokio::test(start_paused = true)]
async fn test_wait_returns_only_after_completed() {
    let cloud = FakeCloud::new().script(
        "snapshot",
        vec![
            OperationStatus::InProgress,
            OperationStatus::InProgress,
            OperationStatus::Completed,
        ],
    );
    let operation = cloud.start_operation("snapshot");

    let started = tokio::time::Instant::now();
    wait_for_operation(&cloud, &operation, &config()).await.unwrap();

    assert_eq!(cloud.status_polls(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_wait_times_out_when_never_finished() {
    let cloud = FakeCloud::new().stuck("shutdown");
    let operation = cloud.start_operation("shutdown");

    let err = wait_for_operation(&cloud, &operation, &config())
        .await
        .unwrap_err();

    match err {
        CloudError::OperationTimedOut { operation, waited } => {
            assert!(operation.starts_with("shutdown #"));
            assert!(waited >= Duration::from_secs(30));
        }
        other => panic!("expected OperationTimedOut, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_wait_reports_provider_error() {
    let cloud = FakeCloud::new().script(
        "create",
        vec![
            OperationStatus::InProgress,
            OperationStatus::Errored {
                message: "errored".to_string(),
            },
        ],
    );
    let operation = cloud.start_operation("create");

    let err = wait_for_operation(&cloud, &operation, &config())
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::OperationFailed { ref message, .. } if message == "errored"));
    assert!(!err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_wait_skips_polling_for_completed_handle() {
    let cloud = FakeCloud::new();
    let operation = PendingOperation::completed("destroy_image");

    wait_for_operation(&cloud, &operation, &config()).await.unwrap();

    assert_eq!(cloud.status_polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_power_off_on_off_droplet() {
    let cloud = FakeCloud::new().with_droplet(1, "web-01", PowerStatus::Off);

    wait_for_power_off(&cloud, 1, &config()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_power_off_times_out_on_running_droplet() {
    let cloud = FakeCloud::new().with_droplet(1, "web-01", PowerStatus::Running);

    let err = wait_for_power_off(&cloud, 1, &config()).await.unwrap_err();

    assert!(err.is_timeout());
}
