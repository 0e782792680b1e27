use super::*;
use crate::test_support::{branch_json, numbered, page, repo_json, walker, MockGitHubApi};
use serde_json::json;

fn octocat() -> Arc<User> {
    Arc::new(User::with_login("octocat"))
}

#[tokio::test]
async fn test_get_all_keeps_user_identity() {
    let (walker, api) = walker(MockGitHubApi::new().with_response(
        "list_repos_for_user",
        page(json!([repo_json("hello-world"), repo_json("linguist")]), None),
    ));
    let user = octocat();

    let repos = walker.repos().get_all(&user, &ListOptions::default()).await.unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[1].name(), "linguist");
    assert_eq!(repos[0].data().default_branch.as_deref(), Some("main"));
    for repo in &repos {
        assert!(Arc::ptr_eq(repo.user(), &user));
    }
    assert_eq!(
        api.calls("list_repos_for_user"),
        vec!["octocat ListReposParams { per_page: None, sort: None }"]
    );
}

#[tokio::test]
async fn test_get_all_threads_count_and_page_size() {
    let repos_page = |start: u64| {
        let items: Vec<_> = numbered(start, 5)
            .as_array()
            .unwrap()
            .iter()
            .map(|item| repo_json(&format!("repo-{}", item["id"])))
            .collect();
        serde_json::Value::Array(items)
    };
    let (walker, api) = walker(
        MockGitHubApi::new()
            .with_response("list_repos_for_user", page(repos_page(1), Some(2)))
            .with_response("get_next_page", page(repos_page(6), Some(3)))
            .with_response("get_next_page", page(repos_page(11), None)),
    );
    let options = ListOptions {
        count: Some(7),
        per_page: Some(5),
    };

    let repos = walker.repos().get_all(&octocat(), &options).await.unwrap();

    assert_eq!(repos.len(), 10);
    assert_eq!(api.call_count("get_next_page"), 1);
    assert_eq!(
        api.calls("list_repos_for_user"),
        vec!["octocat ListReposParams { per_page: Some(5), sort: None }"]
    );
}

#[tokio::test]
async fn test_get_all_unknown_user() {
    let (walker, _api) = walker(
        MockGitHubApi::new().with_error("list_repos_for_user", github_api::Error::NotFound),
    );

    let result = walker.repos().get_all(&octocat(), &ListOptions::default()).await;

    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_get_branch_delegates_with_owner() {
    let (walker, api) = walker(
        MockGitHubApi::new().with_response("get_branch", page(branch_json("main", "abc123"), None)),
    );
    let user = octocat();
    let repo = Arc::new(Repo::new(
        RepoData {
            name: "hello-world".to_string(),
            ..Default::default()
        },
        user.clone(),
    ));

    let branch = repo.get_branch(&walker, "main").await.unwrap().unwrap();

    assert_eq!(branch.name(), "main");
    assert!(Arc::ptr_eq(branch.repo(), &repo));
    assert!(Arc::ptr_eq(branch.user(), &user));
    assert_eq!(api.calls("get_branch"), vec!["octocat/hello-world main"]);
}

#[tokio::test]
async fn test_get_branches_delegates_with_owner() {
    let (walker, api) = walker(MockGitHubApi::new().with_response(
        "list_branches",
        page(json!([branch_json("main", "a"), branch_json("dev", "b")]), None),
    ));
    let repo = Arc::new(Repo::new(
        RepoData {
            name: "hello-world".to_string(),
            ..Default::default()
        },
        octocat(),
    ));

    let branches = repo.get_branches(&walker, &ListOptions::default()).await.unwrap();

    assert_eq!(branches.len(), 2);
    assert_eq!(branches[1].commit_sha(), "b");
    assert_eq!(api.call_count("list_branches"), 1);
}
