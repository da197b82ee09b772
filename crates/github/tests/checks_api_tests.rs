//! Integration tests for the GitHub Checks client.
//!
//! A wiremock server stands in for api.github.com so request shapes,
//! headers and error handling can be verified without network access.

use async_trait::async_trait;
use lintcheck_ci::report::{
    CheckConclusion, CheckRunApi, CheckRunOutput, CheckRunReporter, CreateCheckRun,
    ReporterConfig, UpdateCheckRun,
};
use lintcheck_ci::runner::{Linter, ToolOutput};
use lintcheck_core::{Error, Repository, Result};
use lintcheck_github::{CHECKS_ACCEPT, GitHubChecksClient, USER_AGENT};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{bearer_token, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUNS_PATH: &str = "/repos/acme/widgets/check-runs";

fn client(server: &MockServer) -> GitHubChecksClient {
    let repo: Repository = "acme/widgets".parse().unwrap();
    GitHubChecksClient::new(server.uri(), repo, SecretString::from("gh-token")).unwrap()
}

async fn received_bodies(server: &MockServer, verb: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == verb)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

mod create {
    use super::*;

    #[tokio::test]
    async fn posts_in_progress_run_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RUNS_PATH))
            .and(bearer_token("gh-token"))
            .and(header("accept", CHECKS_ACCEPT))
            .and(header("user-agent", USER_AGENT))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "name": "clj-kondo",
                "head_sha": "deadbeef",
                "status": "in_progress"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"id": 8731, "status": "in_progress", "name": "clj-kondo"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let id = client(&server)
            .create_check_run(&CreateCheckRun::started("clj-kondo", "deadbeef"))
            .await
            .unwrap();
        assert_eq!(id, 8731);

        let bodies = received_bodies(&server, "POST").await;
        assert!(bodies[0]["started_at"].is_string());
    }

    #[tokio::test]
    async fn rejected_create_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RUNS_PATH))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"message": "Resource not accessible by integration"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .create_check_run(&CreateCheckRun::started("clj-kondo", "deadbeef"))
            .await
            .unwrap_err();
        match err {
            Error::Api {
                operation,
                status,
                body,
            } => {
                assert_eq!(operation, "create check run");
                assert_eq!(status, 403);
                assert!(body.unwrap().contains("Resource not accessible"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_without_id_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RUNS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .create_check_run(&CreateCheckRun::started("clj-kondo", "deadbeef"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_api_is_http_error() {
        let repo: Repository = "acme/widgets".parse().unwrap();
        let client =
            GitHubChecksClient::new("http://127.0.0.1:1", repo, SecretString::from("gh-token"))
                .unwrap();
        let err = client
            .create_check_run(&CreateCheckRun::started("clj-kondo", "deadbeef"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn patches_run_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("{RUNS_PATH}/8731")))
            .and(bearer_token("gh-token"))
            .and(header("accept", CHECKS_ACCEPT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 8731})))
            .expect(1)
            .mount(&server)
            .await;

        let update = UpdateCheckRun::completed(
            "clj-kondo",
            "deadbeef",
            CheckConclusion::Neutral,
            Some(CheckRunOutput {
                title: "clj-kondo".to_string(),
                summary: "linting took 3ms, errors: 0, warnings: 1, info: 0".to_string(),
                annotations: vec![],
            }),
        );
        client(&server).update_check_run(8731, &update).await.unwrap();

        let bodies = received_bodies(&server, "PATCH").await;
        assert_eq!(bodies[0]["status"], "completed");
        assert_eq!(bodies[0]["conclusion"], "neutral");
        assert_eq!(bodies[0]["head_sha"], "deadbeef");
        assert!(bodies[0]["completed_at"].is_string());
        assert_eq!(
            bodies[0]["output"],
            json!({
                "title": "clj-kondo",
                "summary": "linting took 3ms, errors: 0, warnings: 1, info: 0"
            })
        );
    }

    #[tokio::test]
    async fn rejected_update_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let update = UpdateCheckRun::completed("clj-kondo", "deadbeef", CheckConclusion::Failure, None);
        let err = client(&server)
            .update_check_run(1, &update)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Api {
                status: 422,
                body: None,
                ..
            }
        ));
    }
}

/// The reporter driving the real client end to end.
mod reporter_against_api {
    use super::*;

    struct CannedLinter(ToolOutput);

    #[async_trait]
    impl Linter for CannedLinter {
        async fn run(&self) -> Result<ToolOutput> {
            Ok(self.0.clone())
        }
    }

    fn findings_json(count: usize) -> String {
        let findings: Vec<_> = (0..count)
            .map(|i| {
                json!({"filename": "src/app.clj", "level": "warning", "type": "redundant-do",
                       "row": i + 1, "col": 1, "message": "redundant do"})
            })
            .collect();
        json!({
            "findings": findings,
            "summary": {"error": 2, "warning": 3, "info": 0, "duration": 1500}
        })
        .to_string()
    }

    #[tokio::test]
    async fn posts_create_then_batches_then_conclusion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RUNS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 99})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("{RUNS_PATH}/99")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99})))
            .expect(4)
            .mount(&server)
            .await;

        let reporter = CheckRunReporter::new(
            client(&server),
            CannedLinter(ToolOutput::new(findings_json(120), "", Some(3))),
            ReporterConfig::new("clj-kondo", "deadbeef", "https://github.com/acme/widgets/runs"),
        )
        .with_console(std::io::sink());

        let outcome = reporter.run().await.unwrap();
        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.conclusion, Some(CheckConclusion::Failure));

        let patches = received_bodies(&server, "PATCH").await;
        let sizes: Vec<_> = patches
            .iter()
            .map(|b| b["output"]["annotations"].as_array().map_or(0, Vec::len))
            .collect();
        assert_eq!(sizes, vec![50, 50, 20, 0]);
        assert_eq!(patches[3]["status"], "completed");
        assert_eq!(patches[3]["conclusion"], "failure");
        assert_eq!(
            patches[3]["output"]["summary"],
            "linting took 1500ms, errors: 2, warnings: 3, info: 0"
        );
    }

    #[tokio::test]
    async fn rejected_batch_forces_failure_without_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RUNS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(body_partial_json(json!({"status": "in_progress"})))
            .respond_with(ResponseTemplate::new(422).set_body_string("annotation path invalid"))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(body_partial_json(json!({"status": "completed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
            .mount(&server)
            .await;

        let reporter = CheckRunReporter::new(
            client(&server),
            CannedLinter(ToolOutput::new(findings_json(3), "", Some(0))),
            ReporterConfig::new("clj-kondo", "deadbeef", "https://github.com/acme/widgets/runs"),
        )
        .with_console(std::io::sink());

        let err = reporter.run().await.unwrap_err();
        assert_eq!(err.payload(), Some("annotation path invalid"));

        let patches = received_bodies(&server, "PATCH").await;
        assert_eq!(patches.len(), 2);
        let last = patches.last().unwrap();
        assert_eq!(last["status"], "completed");
        assert_eq!(last["conclusion"], "failure");
        assert!(last.get("output").is_none());
    }
}
