use std::sync::Arc;
use std::time::Duration;

use domain_submission::{
    exception::SubmissionException,
    mock::{MockCommandRunner, MockSchedulerClient},
    model::vo::{AdmissionPolicy, Ceiling, CommandBody, JobHandle, ResourceSpec, RunningSet},
    service::{script_builder, AdmissionService, CommandOutput, SubmissionService},
};
use infrastructure_command::LsfClient;
use service_submission::{AdmissionControllerImpl, SubmissionServiceImpl};
use tokio::time::Instant;

fn spec() -> ResourceSpec {
    ResourceSpec::builder()
        .queue("general")
        .task_count(10)
        .max_time_hours(12)
        .job_name("fah_gen0")
        .build()
}

fn running(ids: &[&str]) -> RunningSet {
    ids.iter().map(|id| JobHandle::from(*id)).collect()
}

fn handles(ids: &[&str]) -> Vec<JobHandle> {
    ids.iter().map(|id| JobHandle::from(*id)).collect()
}

fn controller(scheduler: MockSchedulerClient, policy: AdmissionPolicy) -> AdmissionControllerImpl {
    AdmissionControllerImpl::builder()
        .scheduler(Arc::new(scheduler))
        .policy(policy)
        .build()
}

/// Scheduler mock answering `list_running` with `polls` in order.
fn polling(polls: Vec<RunningSet>) -> MockSchedulerClient {
    let times = polls.len();
    let mut polls = polls.into_iter();
    let mut scheduler = MockSchedulerClient::new();
    scheduler
        .expect_list_running()
        .times(times)
        .returning(move || Ok(polls.next().unwrap_or_default()));
    scheduler
}

#[tokio::test]
async fn test_submit_writes_script_and_returns_id() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("lsf_submission");
    let expected_path = script_path.clone();

    let mut scheduler = MockSchedulerClient::new();
    scheduler
        .expect_submit_script()
        .withf(move |path| path.to_path_buf() == expected_path)
        .times(1)
        .returning(|_| Ok(JobHandle::new("123")));
    let service = SubmissionServiceImpl::builder()
        .scheduler(Arc::new(scheduler))
        .default_output_dir(dir.path())
        .build();

    let body = CommandBody::from(vec!["cd gen0\n".to_string(), "gmx mdrun -v\n".to_string()]);
    let cwd_before = std::env::current_dir().unwrap();
    let job = service.submit(&spec(), &body, None, None).await.unwrap();
    assert_eq!(job.as_str(), "123");
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);

    let written = std::fs::read_to_string(&script_path).unwrap();
    assert_eq!(written, script_builder::render(&spec(), &body).as_str());
    assert!(written.ends_with("# additional specs\n\n\ncd gen0\ngmx mdrun -v\n"));
}

#[tokio::test]
async fn test_submit_overwrites_named_script() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("gen1");
    let script_path = out_dir.join("run.sh");

    let mut scheduler = MockSchedulerClient::new();
    scheduler
        .expect_submit_script()
        .times(2)
        .returning(|_| Ok(JobHandle::new("9")));
    let service = SubmissionServiceImpl::builder().scheduler(Arc::new(scheduler)).build();

    let long = CommandBody::from("python long_running_analysis.py --all\n");
    let short = CommandBody::from("true\n");
    service.submit(&spec(), &long, Some(&out_dir), Some("run.sh")).await.unwrap();
    service.submit(&spec(), &short, Some(&out_dir), Some("run.sh")).await.unwrap();

    let written = std::fs::read_to_string(script_path).unwrap();
    assert_eq!(written, script_builder::render(&spec(), &short).as_str());
}

#[tokio::test]
async fn test_submit_failure_keeps_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut scheduler = MockSchedulerClient::new();
    scheduler.expect_submit_script().times(1).returning(|_| {
        Err(SubmissionException::Submission {
            status: Some(255),
            stderr: "Bad queue name.".to_string(),
        })
    });
    let service = SubmissionServiceImpl::builder()
        .scheduler(Arc::new(scheduler))
        .default_output_dir(dir.path())
        .build();

    let cwd_before = std::env::current_dir().unwrap();
    let err = service
        .submit(&spec(), &CommandBody::from("true\n"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionException::Submission { status: Some(255), .. }));
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);
}

#[tokio::test]
async fn test_submit_validates_before_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let mut scheduler = MockSchedulerClient::new();
    scheduler.expect_submit_script().never();
    let service = SubmissionServiceImpl::builder()
        .scheduler(Arc::new(scheduler))
        .default_output_dir(dir.path())
        .build();

    let bad = ResourceSpec::builder().queue("general").task_count(0).build();
    let err = service.submit(&bad, &CommandBody::from("true\n"), None, None).await.unwrap_err();
    assert!(matches!(err, SubmissionException::Validation { field: "task_count", .. }));

    let err = service
        .submit(&spec(), &CommandBody::from("true\n"), None, Some(" "))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionException::Validation { field: "output_name", .. }));
    assert!(!dir.path().join("lsf_submission").exists());
}

#[tokio::test]
async fn test_submit_through_lsf_client() {
    let dir = tempfile::tempdir().unwrap();
    let mut replies = ["Job <123> is submitted to queue <general>.\n", "Submitted\n"].into_iter();
    let mut runner = MockCommandRunner::new();
    runner.expect_run().times(2).returning(move |_| {
        Ok(CommandOutput {
            status: Some(0),
            stdout: replies.next().unwrap_or_default().to_string(),
            stderr: String::new(),
        })
    });
    let lsf = LsfClient::builder().runner(Arc::new(runner)).build();
    let service = SubmissionServiceImpl::builder()
        .scheduler(Arc::new(lsf))
        .default_output_dir(dir.path())
        .build();

    let body = CommandBody::from("true\n");
    let job = service.submit(&spec(), &body, None, None).await.unwrap();
    assert_eq!(job, JobHandle::new("123"));
    let err = service.submit(&spec(), &body, None, None).await.unwrap_err();
    assert!(matches!(err, SubmissionException::Parse { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_wait_blocks_one_poll_until_under_ceiling() {
    let scheduler = polling(vec![running(&["101", "102"]), running(&["101"])]);
    let policy = AdmissionPolicy {
        ceiling: Ceiling::Bounded(1),
        poll_interval: Duration::from_secs(2),
        max_wait: None,
    };
    let controller = controller(scheduler, policy);

    let started = Instant::now();
    controller.wait(&handles(&["101", "102"]), false).await.unwrap();
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_wait_returns_immediately_under_ceiling() {
    let scheduler = polling(vec![running(&["101", "999", "998"])]);
    let controller = controller(scheduler, AdmissionPolicy::new(Ceiling::Bounded(1)));

    let started = Instant::now();
    controller.wait(&handles(&["101", "102"]), false).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_full_drain_ignores_ceiling() {
    let scheduler = polling(vec![
        running(&["101", "102"]),
        running(&["102"]),
        running(&["102", "555"]),
        running(&["555"]),
    ]);
    let policy = AdmissionPolicy {
        ceiling: Ceiling::Bounded(10),
        poll_interval: Duration::from_secs(5),
        max_wait: None,
    };
    let controller = controller(scheduler, policy);

    let started = Instant::now();
    controller.wait(&handles(&["101", "102"]), true).await.unwrap();
    assert_eq!(started.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_never_polls() {
    let mut scheduler = MockSchedulerClient::new();
    scheduler.expect_list_running().never();
    let controller = controller(scheduler, AdmissionPolicy::new(Ceiling::Unbounded));
    controller.wait(&handles(&["1", "2", "3"]), false).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_listing_aborts_wait() {
    let mut scheduler = MockSchedulerClient::new();
    scheduler.expect_list_running().times(1).returning(|| {
        Err(SubmissionException::UnexpectedResult {
            reason: "expected header `JOBID`, found `LSF`".to_string(),
            output: "LSF is down\n".to_string(),
        })
    });
    let controller = controller(scheduler, AdmissionPolicy::new(Ceiling::Bounded(0)));
    let err = controller.wait(&handles(&["1"]), false).await.unwrap_err();
    assert!(matches!(err, SubmissionException::UnexpectedResult { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_wait_gives_up_after_max_wait() {
    let mut scheduler = MockSchedulerClient::new();
    scheduler
        .expect_list_running()
        .times(4)
        .returning(|| Ok(running(&["1", "2"])));
    let policy = AdmissionPolicy {
        ceiling: Ceiling::Bounded(1),
        poll_interval: Duration::from_secs(2),
        max_wait: Some(Duration::from_secs(5)),
    };
    let controller = controller(scheduler, policy);

    let err = controller.wait(&handles(&["1", "2"]), false).await.unwrap_err();
    match err {
        SubmissionException::WaitTimeout {
            waited,
            still_running,
        } => {
            assert_eq!(waited, Duration::from_secs(6));
            assert_eq!(still_running, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_running_and_log_names() {
    let scheduler = polling(vec![running(&["7", "8"])]);
    let controller = controller(scheduler, AdmissionPolicy::default());
    let set = controller.list_running().await.unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&JobHandle::new("7")));

    assert_eq!(
        controller.submission_log_names(&handles(&["7", "8"])),
        ["lsf_output-7.log", "lsf_output-8.log"]
    );
    assert_eq!(controller.config().ceiling, Ceiling::Unbounded);
    assert_eq!(controller.config().poll_interval, Duration::from_secs(2));
}
