use super::*;
use crate::config::GitHubConfig;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        github: GitHubConfig {
            api_url: server.uri(),
            token_env: "REPO_WALKER_TEST_UNSET_TOKEN_VARIABLE".to_string(),
            per_page: Some(2),
        },
        ..Default::default()
    }
}

async fn mount_branch(server: &MockServer, name: &str, sha: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octocat/hello-world/branches/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "commit": { "sha": sha },
            "protected": false
        })))
        .mount(server)
        .await;
}

async fn run(server: &MockServer, command: WalkCommands) -> Result<Value, Error> {
    let config = config_for(server);
    let walker = connect(&config)?;
    execute(&command, &walker, &config).await
}

#[tokio::test]
async fn test_users_follows_pages_until_count() {
    let server = MockServer::start().await;
    let next = format!("{}/users?since=2&per_page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("since", "0"))
        .and(query_param("per_page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!(r#"<{next}>; rel="next""#).as_str())
                .set_body_json(json!([{ "login": "mojombo" }, { "login": "defunkt" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("since", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{}/users?since=4>; rel="next""#, server.uri()).as_str(),
                )
                .set_body_json(json!([{ "login": "pjhyett" }, { "login": "wycats" }])),
        )
        .mount(&server)
        .await;

    let value = run(&server, WalkCommands::Users { count: Some(3) })
        .await
        .unwrap();

    let logins: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["login"].as_str().unwrap())
        .collect();
    assert_eq!(logins, vec!["mojombo", "defunkt", "pjhyett", "wycats"]);
}

#[tokio::test]
async fn test_zero_count_is_rejected() {
    let server = MockServer::start().await;

    let result = run(
        &server,
        WalkCommands::Repos {
            login: "octocat".to_string(),
            count: Some(0),
        },
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
}

#[tokio::test]
async fn test_repos_outputs_repository_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "hello-world", "full_name": "octocat/hello-world", "private": false }
        ])))
        .mount(&server)
        .await;

    let value = run(
        &server,
        WalkCommands::Repos {
            login: "octocat".to_string(),
            count: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(value[0]["full_name"], "octocat/hello-world");
}

#[tokio::test]
async fn test_branch_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/branches/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Branch not found",
            "documentation_url": "https://docs.github.com/rest/branches/branches#get-a-branch"
        })))
        .mount(&server)
        .await;

    let error = run(
        &server,
        WalkCommands::Branch {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            name: "gone".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(error, Error::BranchNotFound { .. }));
    assert_eq!(error.exit_code(), 2);
}

#[tokio::test]
async fn test_content_is_decoded() {
    let server = MockServer::start().await;
    mount_branch(&server, "main", "7fd1a60").await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/contents/README"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "name": "README",
            "path": "README",
            "encoding": "base64",
            "content": "aGVsbG8=\n"
        })))
        .mount(&server)
        .await;

    let value = run(
        &server,
        WalkCommands::Content {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            branch: "main".to_string(),
            path: "README".to_string(),
            reference: Some("main".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(value["content"], "hello");
}

#[tokio::test]
async fn test_commit_defaults_to_branch_head() {
    let server = MockServer::start().await;
    mount_branch(&server, "main", "7fd1a60").await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/commits/7fd1a60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": "7fd1a60" })))
        .mount(&server)
        .await;

    let value = run(
        &server,
        WalkCommands::Commit {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            branch: "main".to_string(),
            sha: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(value["sha"], "7fd1a60");
}

#[tokio::test]
async fn test_commits_start_at_branch_head() {
    let server = MockServer::start().await;
    mount_branch(&server, "main", "7fd1a60").await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/commits"))
        .and(query_param("sha", "7fd1a60"))
        .and(query_param("per_page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "sha": "7fd1a60" }, { "sha": "553c207" }])),
        )
        .mount(&server)
        .await;

    let value = run(
        &server,
        WalkCommands::Commits {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            branch: "main".to_string(),
            sha: None,
            count: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(value.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_missing_tree_is_empty() {
    let server = MockServer::start().await;
    mount_branch(&server, "main", "7fd1a60").await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/git/trees/deadbeef"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/git/trees#get-a-tree"
        })))
        .mount(&server)
        .await;

    let value = run(
        &server,
        WalkCommands::Tree {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            branch: "main".to_string(),
            sha: Some("deadbeef".to_string()),
            recursive: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(value["tree"], json!([]));
    assert_eq!(value["sha"], Value::Null);
}

#[tokio::test]
async fn test_connect_rejects_invalid_api_url() {
    let config = AppConfig {
        github: GitHubConfig {
            api_url: "not a url".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(matches!(connect(&config), Err(Error::Api(_))));
}
